//! `mount_share` command

use async_trait::async_trait;

use crate::error::ShareError;

use super::{complete_share_keys, Command, CommandContext, CommandLine, TabContext};

pub struct MountShare;

#[async_trait(?Send)]
impl Command for MountShare {
    fn name(&self) -> &'static str {
        "mount_share"
    }

    fn usage(&self) -> &'static str {
        ":mount_share <share_name>\n\
         \n\
         Mount an SMB share by name and navigate to it.\n\
         The share stays mounted until it is unmounted or the session ends.\n\
         \n\
         Example:\n\
         :mount_share media"
    }

    async fn execute(&self, line: &CommandLine, ctx: &mut CommandContext<'_>) {
        let key = line.arg(1);
        if key.is_empty() {
            let err = ShareError::MissingShareName {
                available: ctx.manager.registry().available(),
            };
            ctx.host.error(&err.to_string());
            return;
        }

        if let Err(e) = ctx.manager.mount(key, &mut *ctx.host).await {
            ctx.host.error(&e.to_string());
        }
    }

    fn tab(&self, line: &CommandLine, ctx: &TabContext<'_>) -> Vec<String> {
        complete_share_keys(self.name(), line, ctx.registry)
    }
}
