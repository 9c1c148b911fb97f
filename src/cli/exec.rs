//! Non-interactive execution of command lines

use crate::commands::{CommandContext, CommandSet};
use crate::error::Result;
use crate::host::Host;
use crate::share::ShareManager;

/// Run each line in order, each to completion
pub async fn run(
    lines: &[String],
    commands: &CommandSet,
    manager: &mut ShareManager,
    host: &mut dyn Host,
) -> Result<()> {
    for line in lines {
        let mut ctx = CommandContext {
            manager: &mut *manager,
            host: &mut *host,
        };
        commands.execute_line(line, &mut ctx).await;
    }

    Ok(())
}
