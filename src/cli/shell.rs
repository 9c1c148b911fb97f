//! Interactive command prompt

use std::path::PathBuf;

use console::style;
use dialoguer::{BasicHistory, Completion, Input};

use crate::commands::{CommandContext, CommandSet, TabContext};
use crate::error::Result;
use crate::host::Host;
use crate::share::{ShareManager, ShareRegistry};
use crate::utils::common_prefix;

const HISTORY_SIZE: usize = 100;

/// Tab completion backed by the command set
struct ShellCompletion<'a> {
    commands: &'a CommandSet,
    registry: &'a ShareRegistry,
    cwd: PathBuf,
}

impl Completion for ShellCompletion<'_> {
    fn get(&self, input: &str) -> Option<String> {
        let ctx = TabContext {
            registry: self.registry,
            cwd: &self.cwd,
        };
        let candidates = self.commands.complete(input, &ctx);

        match candidates.len() {
            0 => None,
            1 => candidates.into_iter().next(),
            _ => {
                let prefix = common_prefix(&candidates);
                if prefix.len() > input.len() {
                    Some(prefix)
                } else {
                    candidates.into_iter().next()
                }
            }
        }
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim(), "quit" | "exit" | "q")
}

/// Read and run command lines until the user quits
pub async fn run(
    commands: &CommandSet,
    manager: &mut ShareManager,
    host: &mut dyn Host,
) -> Result<()> {
    println!();
    println!(
        "  {} Type {} for commands, {} to leave. Mounted shares are unmounted on exit.",
        style("sharemount").cyan().bold(),
        style("help").bold(),
        style("quit").bold()
    );
    println!();

    let mut history = BasicHistory::new()
        .max_entries(HISTORY_SIZE)
        .no_duplicates(true);

    loop {
        let cwd = host.current_dir();
        let line = {
            let completion = ShellCompletion {
                commands,
                registry: manager.registry(),
                cwd: cwd.clone(),
            };

            Input::<String>::new()
                .with_prompt(cwd.display().to_string())
                .allow_empty(true)
                .completion_with(&completion)
                .history_with(&mut history)
                .interact_text()
        };

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!("Prompt closed: {}", e);
                break;
            }
        };

        if is_quit(&line) {
            break;
        }

        let mut ctx = CommandContext {
            manager: &mut *manager,
            host: &mut *host,
        };
        commands.execute_line(&line, &mut ctx).await;
    }

    Ok(())
}
