//! CIFS mount utility implementation
//!
//! Attaches SMB shares with the kernel CIFS client through `mount`/`umount`,
//! prefixed with a privilege-escalation program (`sudo` by default).
//!
//! # Requirements
//! - Linux: cifs-utils (provides `mount.cifs`)

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::share::utility::{MountUtility, UtilityError};

/// Filesystem type passed to `mount -t`
pub const FILESYSTEM_TYPE: &str = "cifs";

/// Fixed option set: read-write, guest authentication
pub const MOUNT_OPTIONS: &str = "rw,guest";

/// Helper installed by cifs-utils that `mount -t cifs` dispatches to
const CIFS_HELPER: &str = "mount.cifs";

/// CIFS mount utility
///
/// Runs `[elevate] mount -t cifs -o rw,guest <share> <mount_point>` and
/// `[elevate] umount <mount_point>`.
#[derive(Debug, Clone)]
pub struct CifsUtility {
    elevate: Option<String>,
}

impl Default for CifsUtility {
    fn default() -> Self {
        Self::new("sudo")
    }
}

impl CifsUtility {
    /// Create a CIFS utility. An empty `elevate` runs the programs directly.
    pub fn new(elevate: &str) -> Self {
        let elevate = elevate.trim();
        Self {
            elevate: (!elevate.is_empty()).then(|| elevate.to_string()),
        }
    }

    /// Check if cifs-utils is installed
    pub fn check_helper_installed() -> bool {
        which::which(CIFS_HELPER).is_ok()
            || ["/sbin", "/usr/sbin"]
                .iter()
                .any(|dir| Path::new(dir).join(CIFS_HELPER).exists())
    }

    /// Arguments passed to `mount` for a share
    pub fn mount_args(share_path: &str, mount_point: &Path) -> Vec<OsString> {
        vec![
            "-t".into(),
            FILESYSTEM_TYPE.into(),
            "-o".into(),
            MOUNT_OPTIONS.into(),
            share_path.into(),
            mount_point.as_os_str().to_owned(),
        ]
    }

    /// Build the command for `program`, returning it with the name of the
    /// binary that is actually spawned.
    fn command(&self, program: &str, args: &[OsString]) -> (Command, String) {
        match &self.elevate {
            Some(elevate) => {
                let mut cmd = Command::new(elevate);
                cmd.arg(program).args(args);
                (cmd, elevate.clone())
            }
            None => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                (cmd, program.to_string())
            }
        }
    }
}

#[async_trait]
impl MountUtility for CifsUtility {
    fn name(&self) -> &'static str {
        "cifs"
    }

    async fn is_mounted(&self, mount_point: &Path) -> bool {
        is_mount_point(mount_point).await
    }

    async fn mount(
        &self,
        share_path: &str,
        mount_point: &Path,
        timeout: Duration,
    ) -> Result<(), UtilityError> {
        let (cmd, spawned) = self.command("mount", &Self::mount_args(share_path, mount_point));
        tracing::debug!(
            "Running {} mount -t {} -o {} {} {}",
            spawned,
            FILESYSTEM_TYPE,
            MOUNT_OPTIONS,
            share_path,
            mount_point.display()
        );
        run(cmd, &spawned, timeout).await
    }

    async fn unmount(&self, mount_point: &Path, timeout: Duration) -> Result<(), UtilityError> {
        let (cmd, spawned) = self.command("umount", &[mount_point.as_os_str().to_owned()]);
        tracing::debug!("Running {} umount {}", spawned, mount_point.display());
        run(cmd, &spawned, timeout).await
    }

    fn is_available(&self) -> bool {
        Self::check_helper_installed()
    }
}

/// Run a prepared command to completion within `timeout`
///
/// The child is killed if the timeout expires. Stdin stays attached to the
/// terminal so the escalation program can prompt for a password.
async fn run(mut cmd: Command, program: &str, timeout: Duration) -> Result<(), UtilityError> {
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(UtilityError::NotFound {
                program: program.to_string(),
            });
        }
        Ok(Err(e)) => return Err(UtilityError::Io(e)),
        Err(_) => return Err(UtilityError::TimedOut(timeout)),
    };

    if output.status.success() {
        return Ok(());
    }

    Err(UtilityError::NonZeroExit {
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Check if a path is currently a mount point
///
/// A directory is a mount point when it lives on a different device than its
/// parent, or when it is its own parent (`/`).
pub async fn is_mount_point(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        let Ok(meta) = tokio::fs::symlink_metadata(path).await else {
            return false;
        };
        if !meta.is_dir() {
            return false;
        }

        let Ok(parent) = tokio::fs::metadata(path.join("..")).await else {
            return false;
        };

        meta.dev() != parent.dev() || meta.ino() == parent.ino()
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        false
    }
}

/// Get installation instructions for cifs-utils
pub fn get_install_instructions() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "cifs-utils is not installed.\n\n\
         Install with your package manager:\n\
         Ubuntu/Debian: sudo apt install cifs-utils\n\
         Fedora: sudo dnf install cifs-utils\n\
         Arch: sudo pacman -S cifs-utils"
    }

    #[cfg(not(target_os = "linux"))]
    {
        "CIFS mounts via mount.cifs are only supported on Linux."
    }
}
