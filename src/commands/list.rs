//! `list_mounted_shares` command

use async_trait::async_trait;

use super::{Command, CommandContext, CommandLine};

pub struct ListMountedShares;

#[async_trait(?Send)]
impl Command for ListMountedShares {
    fn name(&self) -> &'static str {
        "list_mounted_shares"
    }

    fn usage(&self) -> &'static str {
        ":list_mounted_shares\n\
         \n\
         List the SMB shares mounted in this session."
    }

    async fn execute(&self, _line: &CommandLine, ctx: &mut CommandContext<'_>) {
        ctx.manager.list(&mut *ctx.host).await;
    }
}
