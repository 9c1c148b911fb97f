use std::path::PathBuf;

use thiserror::Error;

use crate::share::UtilityError;

#[derive(Error, Debug)]
pub enum SharemountError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SharemountError>;

/// The two operations that shell out to the OS mount utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Mount,
    Unmount,
}

impl Operation {
    fn title(self) -> &'static str {
        match self {
            Operation::Mount => "Mount",
            Operation::Unmount => "Unmount",
        }
    }

    fn gerund(self) -> &'static str {
        match self {
            Operation::Mount => "mounting",
            Operation::Unmount => "unmounting",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Mount => write!(f, "mount"),
            Operation::Unmount => write!(f, "unmount"),
        }
    }
}

/// Failures of a share command.
///
/// The `Display` text of every variant is the message shown to the user;
/// commands never let these escape to the host.
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Please specify a share name ({available})")]
    MissingShareName { available: String },

    #[error("Unknown share: {key}. Available: {available}")]
    UnknownShare { key: String, available: String },

    #[error("Failed to create mount point {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} command not found. Please install cifs-utils")]
    UtilityNotFound { program: String },

    #[error("{} operation timed out for {display_name}", .operation.title())]
    Timeout {
        operation: Operation,
        display_name: String,
    },

    #[error("Failed to {operation} {display_name}: {stderr}")]
    NonZeroExit {
        operation: Operation,
        display_name: String,
        stderr: String,
    },

    #[error("Error {} {display_name}: {source}", .operation.gerund())]
    Unexpected {
        operation: Operation,
        display_name: String,
        #[source]
        source: std::io::Error,
    },
}

impl ShareError {
    /// Attach share context to a raw utility failure
    pub fn from_utility(err: UtilityError, operation: Operation, display_name: &str) -> Self {
        let display_name = display_name.to_string();
        match err {
            UtilityError::NotFound { program } => ShareError::UtilityNotFound { program },
            UtilityError::TimedOut(_) => ShareError::Timeout {
                operation,
                display_name,
            },
            UtilityError::NonZeroExit { stderr, .. } => ShareError::NonZeroExit {
                operation,
                display_name,
                stderr,
            },
            UtilityError::Io(source) => ShareError::Unexpected {
                operation,
                display_name,
                source,
            },
        }
    }
}
