//! Test doubles for the share manager and commands

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::host::{Host, Severity};

use super::utility::{MountUtility, UtilityError};

/// A recorded utility invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: &'static str,
    pub mount_point: PathBuf,
    pub timeout: Duration,
}

/// Scripted failure returned by [`FakeUtility`]
#[derive(Debug, Clone)]
pub enum FakeFailure {
    NonZero(String),
    Timeout,
    NotFound,
}

impl FakeFailure {
    fn into_error(self, program: &str, timeout: Duration) -> UtilityError {
        match self {
            FakeFailure::NonZero(stderr) => UtilityError::NonZeroExit {
                code: Some(32),
                stderr,
            },
            FakeFailure::Timeout => UtilityError::TimedOut(timeout),
            FakeFailure::NotFound => UtilityError::NotFound {
                program: program.to_string(),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub mounted: HashSet<PathBuf>,
    pub calls: Vec<Call>,
    pub mount_failure: Option<FakeFailure>,
    pub unmount_failures: HashMap<PathBuf, FakeFailure>,
    pub mount_delay: Option<Duration>,
}

/// In-memory mount utility; clones share state so a test can keep a handle
/// after boxing one into a manager.
#[derive(Debug, Clone, Default)]
pub struct FakeUtility {
    state: Arc<Mutex<FakeState>>,
}

impl FakeUtility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn mark_mounted(&self, path: &Path) {
        self.state().mounted.insert(path.to_path_buf());
    }

    pub fn mark_unmounted(&self, path: &Path) {
        self.state().mounted.remove(path);
    }

    pub fn fail_mount(&self, failure: FakeFailure) {
        self.state().mount_failure = Some(failure);
    }

    /// Make mounts take effect, then keep running for `delay`
    pub fn slow_mount(&self, delay: Duration) {
        self.state().mount_delay = Some(delay);
    }

    pub fn fail_unmount(&self, path: &Path, failure: FakeFailure) {
        self.state()
            .unmount_failures
            .insert(path.to_path_buf(), failure);
    }
}

#[async_trait]
impl MountUtility for FakeUtility {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn is_mounted(&self, mount_point: &Path) -> bool {
        self.state().mounted.contains(mount_point)
    }

    async fn mount(
        &self,
        _share_path: &str,
        mount_point: &Path,
        timeout: Duration,
    ) -> Result<(), UtilityError> {
        let delay = {
            let mut state = self.state();
            state.calls.push(Call {
                operation: "mount",
                mount_point: mount_point.to_path_buf(),
                timeout,
            });
            if let Some(failure) = state.mount_failure.clone() {
                return Err(failure.into_error("mount", timeout));
            }
            state.mounted.insert(mount_point.to_path_buf());
            state.mount_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn unmount(&self, mount_point: &Path, timeout: Duration) -> Result<(), UtilityError> {
        let mut state = self.state();
        state.calls.push(Call {
            operation: "unmount",
            mount_point: mount_point.to_path_buf(),
            timeout,
        });
        if let Some(failure) = state.unmount_failures.get(mount_point).cloned() {
            return Err(failure.into_error("umount", timeout));
        }
        // Like the kernel, refuse while the process works inside the mount
        let busy = std::env::current_dir()
            .map(|cwd| cwd.starts_with(mount_point))
            .unwrap_or(false);
        if busy {
            return Err(FakeFailure::NonZero(format!(
                "umount: {}: target is busy.",
                mount_point.display()
            ))
            .into_error("umount", timeout));
        }
        state.mounted.remove(mount_point);
        Ok(())
    }
}

/// Host that records everything the commands ask of it
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub messages: Vec<(String, Severity)>,
    pub visited: Vec<PathBuf>,
    pub edited: Vec<PathBuf>,
    pub selected: Option<PathBuf>,
    pub cwd: PathBuf,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(_, s)| *s == Severity::Error)
            .map(|(m, _)| m.as_str())
            .collect()
    }

    pub fn infos(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(_, s)| *s == Severity::Info)
            .map(|(m, _)| m.as_str())
            .collect()
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.messages.iter().any(|(m, _)| m.contains(needle))
    }
}

impl Host for RecordingHost {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.messages.push((message.to_string(), severity));
    }

    fn change_directory(&mut self, path: &Path) {
        self.cwd = path.to_path_buf();
        self.visited.push(path.to_path_buf());
    }

    fn edit_file(&mut self, path: &Path) {
        self.edited.push(path.to_path_buf());
    }

    fn selected_file(&self) -> Option<PathBuf> {
        self.selected.clone()
    }

    fn current_dir(&self) -> PathBuf {
        self.cwd.clone()
    }
}
