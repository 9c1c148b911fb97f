//! Host application interface
//!
//! The share commands run inside a host (a file manager, or the bundled
//! terminal prompt). They only talk to it through [`Host`].

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use console::style;

/// How a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Services the host application provides to commands
pub trait Host {
    /// Show a message to the user
    fn notify(&mut self, message: &str, severity: Severity);

    /// Change the host's working directory
    fn change_directory(&mut self, path: &Path);

    /// Open a file in the user's editor
    fn edit_file(&mut self, path: &Path);

    /// The file currently selected in the host, if any
    fn selected_file(&self) -> Option<PathBuf> {
        None
    }

    /// The host's working directory
    fn current_dir(&self) -> PathBuf;

    fn info(&mut self, message: &str) {
        self.notify(message, Severity::Info);
    }

    fn error(&mut self, message: &str) {
        self.notify(message, Severity::Error);
    }
}

/// Host backed by the process terminal
///
/// Notifications are printed and files are edited with `$VISUAL`/`$EDITOR`
/// (falling back to `vi`). The working directory is the host's own state;
/// the process never enters a share, so a share is never kept busy by it.
pub struct TerminalHost {
    cwd: PathBuf,
    editor: String,
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalHost {
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        let editor = std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .unwrap_or_else(|_| "vi".to_string());

        Self::with_editor(cwd, editor)
    }

    pub fn with_editor(cwd: impl Into<PathBuf>, editor: impl Into<String>) -> Self {
        Self {
            cwd: cwd.into(),
            editor: editor.into(),
        }
    }

    fn launch_editor(&self, path: &Path) -> anyhow::Result<()> {
        let status = std::process::Command::new(&self.editor)
            .arg(path)
            .current_dir(&self.cwd)
            .status()
            .with_context(|| format!("failed to launch editor '{}'", self.editor))?;

        if !status.success() {
            bail!("editor '{}' exited with {}", self.editor, status);
        }
        Ok(())
    }
}

impl Host for TerminalHost {
    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => println!("  {}", message),
            Severity::Error => {
                eprintln!("  {} {}", style("✕").red().bold(), style(message).red())
            }
        }
    }

    fn change_directory(&mut self, path: &Path) {
        if !path.is_dir() {
            self.error(&format!(
                "Could not change directory to {}: not a directory",
                path.display()
            ));
            return;
        }

        self.cwd = path.to_path_buf();
        println!("  {} {}", style("→").cyan(), style(path.display()).green());
    }

    fn edit_file(&mut self, path: &Path) {
        if let Err(e) = self.launch_editor(path) {
            tracing::debug!("Editor failed for {}: {:#}", path.display(), e);
            self.error(&format!("{:#}", e));
        }
    }

    fn current_dir(&self) -> PathBuf {
        self.cwd.clone()
    }
}
