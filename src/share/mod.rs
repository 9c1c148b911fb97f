//! SMB share mounting for the current session
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ShareManager                          │
//! │   ShareRegistry        Session (tracker)                     │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │                 trait MountUtility                    │  │
//! │  │  + is_mounted(mount_point) -> bool                    │  │
//! │  │  + mount(share, mount_point, timeout)                 │  │
//! │  │  + unmount(mount_point, timeout)                      │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │                              │                               │
//! │                              ▼                               │
//! │                      ┌─────────────┐                         │
//! │                      │ CifsUtility │                         │
//! │                      └─────────────┘                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every share mounted through the manager is tracked in the session and
//! unmounted by [`ShareManager::shutdown`].

pub mod config;
pub mod drivers;
pub mod state;
pub mod utility;

#[cfg(test)]
pub mod testing;

pub use config::{ShareDefinition, ShareRegistry};
pub use drivers::{get_install_instructions, CifsUtility};
pub use state::{MountedShare, Session};
pub use utility::{MountUtility, UtilityError};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Operation, ShareError};
use crate::host::Host;
use crate::utils::format_elapsed;

/// Timeout for interactive mount and unmount
pub const MOUNT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for each unmount during shutdown
pub const CLEANUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Permissions for newly created mount point directories
#[cfg(unix)]
const MOUNT_POINT_MODE: u32 = 0o755;

/// Result of a successful mount request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    /// The share was mounted by this call
    Mounted(PathBuf),
    /// The mount point was already active; nothing was done
    AlreadyMounted(PathBuf),
}

/// Result of a successful unmount request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnmountOutcome {
    /// The share was unmounted by this call
    Unmounted { directory_removed: bool },
    /// The mount point was not active; nothing was done
    NotMounted,
}

/// What shutdown did with each tracked share
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub unmounted: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    pub fn is_empty(&self) -> bool {
        self.unmounted.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Mounts and unmounts registry shares and tracks them for cleanup
pub struct ShareManager {
    registry: ShareRegistry,
    utility: Box<dyn MountUtility>,
    session: Session,
}

impl ShareManager {
    pub fn new(registry: ShareRegistry, utility: Box<dyn MountUtility>) -> Self {
        tracing::debug!(
            "Share manager ready with {} share(s) using the {} utility",
            registry.len(),
            utility.name()
        );
        Self {
            registry,
            utility,
            session: Session::default(),
        }
    }

    pub fn registry(&self) -> &ShareRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn lookup(&self, key: &str) -> Result<ShareDefinition, ShareError> {
        self.registry
            .get(key)
            .cloned()
            .ok_or_else(|| ShareError::UnknownShare {
                key: key.trim().to_lowercase(),
                available: self.registry.available(),
            })
    }

    /// Mount a share and navigate the host to it
    ///
    /// Mounting a share whose mount point is already active only navigates.
    pub async fn mount(
        &mut self,
        key: &str,
        host: &mut dyn Host,
    ) -> Result<MountOutcome, ShareError> {
        let share = self.lookup(key)?;
        let mount_point = share.resolve_mount_point();

        if self.utility.is_mounted(&mount_point).await {
            host.info(&format!(
                "{} is already mounted at {}",
                share.display_name,
                mount_point.display()
            ));
            host.change_directory(&mount_point);
            return Ok(MountOutcome::AlreadyMounted(mount_point));
        }

        if !mount_point.exists() {
            create_mount_point(&mount_point).map_err(|source| ShareError::DirectoryCreation {
                path: mount_point.clone(),
                source,
            })?;
            host.info(&format!("Created mount point: {}", mount_point.display()));
        }

        host.info(&format!("Mounting {}...", share.display_name));
        self.utility
            .mount(&share.share_path, &mount_point, MOUNT_TIMEOUT)
            .await
            .map_err(|e| {
                tracing::debug!("Mount of {} failed: {}", share.share_path, e);
                ShareError::from_utility(e, Operation::Mount, &share.display_name)
            })?;

        tracing::info!(
            "Mounted {} at {}",
            share.share_path,
            mount_point.display()
        );
        host.info(&format!("Successfully mounted {}", share.display_name));
        self.session
            .add_mount(MountedShare::new(&share, mount_point.clone()));
        host.change_directory(&mount_point);

        Ok(MountOutcome::Mounted(mount_point))
    }

    /// Unmount a share and remove its mount point if it is empty
    pub async fn unmount(
        &mut self,
        key: &str,
        host: &mut dyn Host,
    ) -> Result<UnmountOutcome, ShareError> {
        let share = self.lookup(key)?;
        let mount_point = share.resolve_mount_point();

        if !self.utility.is_mounted(&mount_point).await {
            host.info(&format!(
                "{} is not mounted at {}",
                share.display_name,
                mount_point.display()
            ));
            return Ok(UnmountOutcome::NotMounted);
        }

        // A working directory inside the share keeps it busy
        if host.current_dir().starts_with(&mount_point) {
            if let Some(parent) = mount_point.parent() {
                host.change_directory(parent);
            }
        }

        host.info(&format!("Unmounting {}...", share.display_name));
        self.utility
            .unmount(&mount_point, MOUNT_TIMEOUT)
            .await
            .map_err(|e| {
                tracing::debug!("Unmount of {} failed: {}", mount_point.display(), e);
                ShareError::from_utility(e, Operation::Unmount, &share.display_name)
            })?;

        tracing::info!("Unmounted {}", mount_point.display());
        host.info(&format!("Successfully unmounted {}", share.display_name));

        if self.session.find_by_mount_point(&mount_point).is_none() {
            tracing::debug!(
                "{} was not mounted by this session",
                mount_point.display()
            );
        }
        self.session.remove_mount(&mount_point);

        let directory_removed = match std::fs::remove_dir(&mount_point) {
            Ok(()) => {
                host.info(&format!(
                    "Removed mount point directory: {}",
                    mount_point.display()
                ));
                true
            }
            Err(e) => {
                host.info(&format!(
                    "Could not remove mount point directory {}: {}",
                    mount_point.display(),
                    e
                ));
                false
            }
        };

        Ok(UnmountOutcome::Unmounted { directory_removed })
    }

    /// Report the shares mounted in this session, flagging stale entries
    pub async fn list(&self, host: &mut dyn Host) {
        if self.session.is_empty() {
            host.info("No shares mounted in this session");
            return;
        }

        host.info("Mounted shares in this session:");
        for share in self.session.mounts() {
            if self.utility.is_mounted(&share.mount_point).await {
                host.info(&format!(
                    "  {} at {} (mounted {} ago)",
                    share.display_name,
                    share.mount_point.display(),
                    format_elapsed(share.mounted_at)
                ));
            } else {
                host.error(&format!(
                    "  {} at {} (not mounted)",
                    share.display_name,
                    share.mount_point.display()
                ));
            }
        }
    }

    /// Unmount everything this session mounted
    ///
    /// Failures are logged per share and never stop the remaining ones.
    /// The tracker is drained, so a second call does nothing.
    pub async fn shutdown(&mut self) -> CleanupReport {
        let mut report = CleanupReport::default();
        let mounts = self.session.drain();

        if mounts.is_empty() {
            tracing::debug!("No session shares to clean up");
            return report;
        }

        tracing::info!("Cleaning up {} session share(s)", mounts.len());

        for share in mounts {
            let mount_point = share.mount_point;

            if !self.utility.is_mounted(&mount_point).await {
                tracing::debug!(
                    "{} is no longer mounted at {}, skipping",
                    share.display_name,
                    mount_point.display()
                );
                report.skipped.push(mount_point);
                continue;
            }

            match self.utility.unmount(&mount_point, CLEANUP_TIMEOUT).await {
                Ok(()) => {
                    tracing::info!(
                        "Unmounted {} at {}",
                        share.display_name,
                        mount_point.display()
                    );
                    remove_mount_point_logged(&mount_point);
                    report.unmounted.push(mount_point);
                }
                Err(e) => {
                    tracing::warn!("Failed to unmount {}: {}", share.display_name, e);
                    remove_mount_point_logged(&mount_point);
                    report.failed.push((mount_point, e.to_string()));
                }
            }
        }

        report
    }
}

impl Drop for ShareManager {
    fn drop(&mut self) {
        if !self.session.is_empty() {
            tracing::warn!(
                "{} share(s) still mounted; shutdown() was not called",
                self.session.len()
            );
        }
    }
}

fn create_mount_point(path: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(MOUNT_POINT_MODE);
    }

    builder.create(path)
}

fn remove_mount_point_logged(path: &Path) {
    match std::fs::remove_dir(path) {
        Ok(()) => tracing::info!("Removed mount point directory: {}", path.display()),
        Err(e) => tracing::warn!(
            "Could not remove mount point directory {}: {}",
            path.display(),
            e
        ),
    }
}
