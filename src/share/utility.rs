//! Mount utility trait definition
//!
//! Defines the interface to the OS programs that attach and detach shares.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Raw outcome of a failed utility invocation, before share context is attached
#[derive(Error, Debug)]
pub enum UtilityError {
    #[error("{program} not found")]
    NotFound { program: String },

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("exited with status {}: {stderr}", .code.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Trait that all mount utilities must implement
///
/// Implementations are responsible for invoking the platform programs and
/// classifying their failures. They never touch the session tracker.
#[async_trait]
pub trait MountUtility: Send + Sync {
    /// Returns the utility name (e.g., "cifs")
    fn name(&self) -> &'static str;

    /// Check whether `mount_point` is currently an active OS mount point
    async fn is_mounted(&self, mount_point: &Path) -> bool;

    /// Attach `share_path` at `mount_point`, giving up after `timeout`
    async fn mount(
        &self,
        share_path: &str,
        mount_point: &Path,
        timeout: Duration,
    ) -> Result<(), UtilityError>;

    /// Detach whatever is mounted at `mount_point`, giving up after `timeout`
    async fn unmount(&self, mount_point: &Path, timeout: Duration) -> Result<(), UtilityError>;

    /// Check if the helper programs this utility relies on are installed
    fn is_available(&self) -> bool {
        true
    }
}
