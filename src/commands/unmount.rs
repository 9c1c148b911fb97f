//! `unmount_share` command

use async_trait::async_trait;

use crate::error::ShareError;

use super::{complete_share_keys, Command, CommandContext, CommandLine, TabContext};

pub struct UnmountShare;

#[async_trait(?Send)]
impl Command for UnmountShare {
    fn name(&self) -> &'static str {
        "unmount_share"
    }

    fn usage(&self) -> &'static str {
        ":unmount_share <share_name>\n\
         \n\
         Unmount an SMB share by name and remove its mount point if empty.\n\
         \n\
         Example:\n\
         :unmount_share media"
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

        if let Err(e) = ctx.manager.unmount(key, &mut *ctx.host).await {
            ctx.host.error(&e.to_string());
        }
    }

    fn tab(&self, line: &CommandLine, ctx: &TabContext<'_>) -> Vec<String> {
        complete_share_keys(self.name(), line, ctx.registry)
    }
}
