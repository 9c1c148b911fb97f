//! Session mount tracking
//!
//! Records the shares mounted during the current session so they can be
//! unmounted when the session ends. Nothing here is persisted.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::config::ShareDefinition;

/// A share mounted by this session
#[derive(Debug, Clone, PartialEq)]
pub struct MountedShare {
    /// Registry key the share was mounted under
    pub key: String,

    /// Human readable name
    pub display_name: String,

    /// UNC path of the remote share
    pub share_path: String,

    /// Mount point with `~` already expanded
    pub mount_point: PathBuf,

    /// When the share was mounted
    pub mounted_at: DateTime<Utc>,
}

impl MountedShare {
    /// Record a successful mount of `share` at the resolved `mount_point`
    pub fn new(share: &ShareDefinition, mount_point: impl Into<PathBuf>) -> Self {
        Self {
            key: share.key.clone(),
            display_name: share.display_name.clone(),
            share_path: share.share_path.clone(),
            mount_point: mount_point.into(),
            mounted_at: Utc::now(),
        }
    }
}

/// In-memory tracker of shares mounted during this session
///
/// Holds at most one entry per resolved mount point.
#[derive(Debug, Default)]
pub struct Session {
    mounts: Vec<MountedShare>,
}

impl Session {
    /// Track a mounted share, replacing any entry with the same mount point
    pub fn add_mount(&mut self, share: MountedShare) {
        self.mounts.retain(|m| m.mount_point != share.mount_point);
        self.mounts.push(share);
    }

    /// Stop tracking every entry at `mount_point`, returning how many were removed
    pub fn remove_mount(&mut self, mount_point: &Path) -> usize {
        let before = self.mounts.len();
        self.mounts.retain(|m| m.mount_point != mount_point);
        before - self.mounts.len()
    }

    /// Find a tracked share by local mount point
    pub fn find_by_mount_point(&self, mount_point: &Path) -> Option<&MountedShare> {
        self.mounts.iter().find(|m| m.mount_point == mount_point)
    }

    /// Tracked shares in mount order
    pub fn mounts(&self) -> &[MountedShare] {
        &self.mounts
    }

    /// Take every tracked share, leaving the session empty
    pub fn drain(&mut self) -> Vec<MountedShare> {
        std::mem::take(&mut self.mounts)
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}
