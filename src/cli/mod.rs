mod exec;
mod shares;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use crate::commands::CommandSet;
use crate::config::AppConfig;
use crate::error::Result;
use crate::host::TerminalHost;
use crate::share::{get_install_instructions, CifsUtility, MountUtility, ShareManager};

#[derive(Parser)]
#[command(name = "sharemount")]
#[command(version)]
#[command(about = "Session-scoped SMB share mounting")]
#[command(long_about = "Mount SMB/CIFS shares by name from a terminal prompt.\n\nEvery share mounted during the session is unmounted when it ends.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the shares file (default: <config dir>/sharemount/shares.json)
    #[arg(short, long, global = true, env = "SHAREMOUNT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Refuse to start if the shares file cannot be parsed
    #[arg(long, global = true)]
    pub strict_config: bool,

    /// Program used to run mount/umount with privileges (empty to run directly)
    #[arg(long, global = true, env = "SHAREMOUNT_ELEVATE", default_value = "sudo")]
    pub elevate: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive prompt (default)
    Shell,

    /// Run command lines in order, then unmount everything
    Exec {
        /// Command lines, e.g. "mount_share media"
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// List the configured shares
    Shares,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = AppConfig::new(self.config, self.strict_config, self.elevate)?;
        let registry = config.load_registry()?;

        let command = self.command.unwrap_or(Commands::Shell);
        if let Commands::Shares = command {
            shares::print(&config, &registry);
            return Ok(());
        }

        let utility = CifsUtility::new(&config.elevate);
        if !utility.is_available() {
            tracing::warn!("mount.cifs was not found; mounting will likely fail");
            println!();
            println!("{}", style(get_install_instructions()).yellow());
            println!();
        }

        let mut manager = ShareManager::new(registry, Box::new(utility));
        let mut host = TerminalHost::new();
        let commands = CommandSet::default();

        let interrupts = watch_interrupts();
        tokio::task::yield_now().await;
        let result = match command {
            Commands::Exec { lines } => {
                exec::run(&lines, &commands, &mut manager, &mut host).await
            }
            _ => shell::run(&commands, &mut manager, &mut host).await,
        };

        let report = manager.shutdown().await;
        interrupts.abort();
        if report.is_empty() {
            tracing::debug!("Nothing to clean up");
        } else if !report.failed.is_empty() {
            tracing::warn!(
                "{} share(s) could not be unmounted during cleanup",
                report.failed.len()
            );
        }

        result
    }
}

/// Absorb Ctrl-C for the rest of the session
///
/// A command is never cancelled halfway: a mount that already took effect
/// must still be tracked, so operations end on their own or by timeout and
/// `shutdown()` always runs.
fn watch_interrupts() -> tokio::task::JoinHandle<()> {
    tokio::spawn(async {
        while tokio::signal::ctrl_c().await.is_ok() {
            println!();
            tracing::warn!("Interrupt ignored until the running command finishes");
        }
    })
}
