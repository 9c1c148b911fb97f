//! Host commands
//!
//! Each command is invoked with a command line typed into the host
//! (`mount_share media`) and reports back through the host's notifications.
//! Commands never return errors; every failure becomes a notification.

mod edit;
mod list;
mod mount;
mod unmount;

pub use edit::MyEdit;
pub use list::ListMountedShares;
pub use mount::MountShare;
pub use unmount::UnmountShare;

use std::path::Path;

use async_trait::async_trait;

use crate::host::Host;
use crate::share::{ShareManager, ShareRegistry};

/// A command line split into whitespace separated words
///
/// Word 0 is the command name.
#[derive(Debug, Clone)]
pub struct CommandLine {
    line: String,
    words: Vec<(usize, usize)>,
}

impl CommandLine {
    pub fn parse(line: &str) -> Self {
        let mut words = Vec::new();
        let mut start = None;

        for (i, c) in line.char_indices() {
            if c.is_whitespace() {
                if let Some(s) = start.take() {
                    words.push((s, i));
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        if let Some(s) = start {
            words.push((s, line.len()));
        }

        Self {
            line: line.to_string(),
            words,
        }
    }

    /// The command name
    pub fn name(&self) -> &str {
        self.arg(0)
    }

    /// The n-th word, or "" if there are fewer words
    pub fn arg(&self, n: usize) -> &str {
        self.words
            .get(n)
            .map(|&(s, e)| &self.line[s..e])
            .unwrap_or("")
    }

    /// Everything from the n-th word to the end of the line
    pub fn rest(&self, n: usize) -> &str {
        self.words
            .get(n)
            .map(|&(s, _)| &self.line[s..])
            .unwrap_or("")
    }

    /// Number of words, including the command name
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// What a command may touch while it runs
pub struct CommandContext<'a> {
    pub manager: &'a mut ShareManager,
    pub host: &'a mut dyn Host,
}

/// What a command may look at while completing
pub struct TabContext<'a> {
    pub registry: &'a ShareRegistry,
    pub cwd: &'a Path,
}

#[async_trait(?Send)]
pub trait Command {
    /// Name typed to invoke the command
    fn name(&self) -> &'static str;

    /// Help text; the first line is the synopsis
    fn usage(&self) -> &'static str;

    async fn execute(&self, line: &CommandLine, ctx: &mut CommandContext<'_>);

    /// Completions for a partially typed line, as full replacement lines
    fn tab(&self, _line: &CommandLine, _ctx: &TabContext<'_>) -> Vec<String> {
        Vec::new()
    }
}

/// Registered commands, dispatched by name
pub struct CommandSet {
    commands: Vec<Box<dyn Command>>,
}

impl Default for CommandSet {
    fn default() -> Self {
        let mut set = Self::new();
        set.register(Box::new(MyEdit));
        set.register(Box::new(MountShare));
        set.register(Box::new(UnmountShare));
        set.register(Box::new(ListMountedShares));
        set
    }
}

impl CommandSet {
    /// An empty command set
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn register(&mut self, command: Box<dyn Command>) {
        self.commands.retain(|c| c.name() != command.name());
        self.commands.push(command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|c| c.name())
    }

    /// Run one command line. Blank lines do nothing.
    pub async fn execute_line(&self, input: &str, ctx: &mut CommandContext<'_>) {
        let line = CommandLine::parse(input);
        if line.is_empty() {
            return;
        }

        if line.name() == "help" {
            self.help(line.arg(1), &mut *ctx.host);
            return;
        }

        match self.get(line.name()) {
            Some(command) => {
                tracing::debug!("Executing '{}'", input.trim());
                command.execute(&line, ctx).await;
            }
            None => ctx.host.error(&format!(
                "Unknown command: {}. Type 'help' for a list of commands",
                line.name()
            )),
        }
    }

    fn help(&self, topic: &str, host: &mut dyn Host) {
        if topic.is_empty() {
            host.info("Available commands:");
            for command in &self.commands {
                let synopsis = command.usage().lines().next().unwrap_or_default();
                host.info(&format!("  {}", synopsis));
            }
            return;
        }

        match self.get(topic) {
            Some(command) => {
                for line in command.usage().lines() {
                    host.info(line);
                }
            }
            None => host.error(&format!("No help for unknown command: {}", topic)),
        }
    }

    /// Completions for a partially typed line
    ///
    /// The first word completes to command names, later words are completed
    /// by the command itself.
    pub fn complete(&self, input: &str, ctx: &TabContext<'_>) -> Vec<String> {
        let line = CommandLine::parse(input);
        let completing_name = line.len() <= 1 && !input.ends_with(char::is_whitespace);

        if completing_name {
            let partial = line.name();
            let mut names: Vec<String> = self
                .names()
                .chain(["help"])
                .filter(|n| n.starts_with(partial))
                .map(String::from)
                .collect();
            names.sort();
            return names;
        }

        match self.get(line.name()) {
            Some(command) => command.tab(&line, ctx),
            None => Vec::new(),
        }
    }
}

/// Complete the first argument of `command` against the registry keys
pub(crate) fn complete_share_keys(
    command: &str,
    line: &CommandLine,
    registry: &ShareRegistry,
) -> Vec<String> {
    let partial = line.rest(1).to_lowercase();
    registry
        .keys()
        .filter(|key| key.starts_with(&partial))
        .map(|key| format!("{} {}", command, key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::testing::{FakeUtility, RecordingHost};
    use crate::share::ShareDefinition;

    fn registry() -> ShareRegistry {
        ShareRegistry::from_definitions([
            ShareDefinition::new("media", "/mnt/media", "//h/Media", "Media"),
            ShareDefinition::new("music", "/mnt/music", "//h/Music", "Music"),
            ShareDefinition::new("downloads", "/mnt/dl", "//h/Downloads", "Downloads"),
        ])
    }

    #[test]
    fn test_command_line_args() {
        let line = CommandLine::parse("my_edit  some file.txt ");
        assert_eq!(line.name(), "my_edit");
        assert_eq!(line.arg(1), "some");
        assert_eq!(line.arg(2), "file.txt");
        assert_eq!(line.arg(3), "");
        assert_eq!(line.rest(1), "some file.txt ");
        assert_eq!(line.rest(5), "");
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn test_command_line_blank() {
        let line = CommandLine::parse("   ");
        assert!(line.is_empty());
        assert_eq!(line.name(), "");
    }

    #[test]
    fn test_default_set_has_all_commands() {
        let set = CommandSet::default();
        let mut names: Vec<_> = set.names().collect();
        names.sort();
        assert_eq!(
            names,
            [
                "list_mounted_shares",
                "mount_share",
                "my_edit",
                "unmount_share"
            ]
        );
    }

    #[test]
    fn test_complete_command_names() {
        let set = CommandSet::default();
        let reg = registry();
        let ctx = TabContext {
            registry: &reg,
            cwd: Path::new("/"),
        };

        assert_eq!(set.complete("mou", &ctx), ["mount_share"]);
        assert_eq!(set.complete("h", &ctx), ["help"]);
        assert!(set.complete("zzz", &ctx).is_empty());
    }

    #[test]
    fn test_complete_share_keys() {
        let set = CommandSet::default();
        let reg = registry();
        let ctx = TabContext {
            registry: &reg,
            cwd: Path::new("/"),
        };

        assert_eq!(
            set.complete("mount_share m", &ctx),
            ["mount_share media", "mount_share music"]
        );
        assert_eq!(
            set.complete("unmount_share d", &ctx),
            ["unmount_share downloads"]
        );
        assert_eq!(set.complete("unmount_share ", &ctx).len(), 3);
        assert!(set.complete("list_mounted_shares ", &ctx).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_is_reported() {
        let set = CommandSet::default();
        let mut manager = ShareManager::new(registry(), Box::new(FakeUtility::new()));
        let mut host = RecordingHost::new();
        let mut ctx = CommandContext {
            manager: &mut manager,
            host: &mut host,
        };

        set.execute_line("frobnicate now", &mut ctx).await;
        set.execute_line("", &mut ctx).await;

        assert_eq!(host.errors().len(), 1);
        assert!(host.errors()[0].starts_with("Unknown command: frobnicate"));
    }

    #[tokio::test]
    async fn test_help_lists_synopses() {
        let set = CommandSet::default();
        let mut manager = ShareManager::new(registry(), Box::new(FakeUtility::new()));
        let mut host = RecordingHost::new();
        let mut ctx = CommandContext {
            manager: &mut manager,
            host: &mut host,
        };

        set.execute_line("help", &mut ctx).await;
        set.execute_line("help mount_share", &mut ctx).await;

        assert!(host.saw(":mount_share <share_name>"));
        assert!(host.saw(":list_mounted_shares"));
        assert!(host.saw("Mount an SMB share by name and navigate to it."));
    }
}
