//! Error types for singleton-process.
//!
//! Uses thiserror for derive macros. Contention and I/O failure are kept
//! apart so callers can decide to wait, abort, or report.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for singleton-process operations.
#[derive(Error, Debug)]
pub enum SingletonError {
    /// The non-blocking lock attempt found the slot held elsewhere.
    #[error("{name} is already running{}", holder_suffix(.pid))]
    AlreadyRunning {
        /// Slot name.
        name: String,
        /// Pid recorded in the marker, if it could be read.
        pid: Option<u32>,
    },

    /// Opening, locking, writing, or syncing a file failed for a reason
    /// other than contention.
    #[error("I/O error during {operation} on {}: {source}", .path.display())]
    Io {
        /// What was being attempted.
        operation: String,
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The slot name cannot be turned into a marker file name.
    #[error("invalid process name '{0}': must be non-empty and contain no path separators")]
    InvalidName(String),

    /// Bad arguments, unreadable config, or another caller-side problem.
    #[error("{0}")]
    UserError(String),
}

fn holder_suffix(pid: &Option<u32>) -> String {
    match pid {
        Some(pid) => format!(" (pid {})", pid),
        None => String::new(),
    }
}

impl SingletonError {
    /// Build an `Io` error for `operation` on `path`.
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SingletonError::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SingletonError::AlreadyRunning { .. } => exit_codes::ALREADY_RUNNING,
            SingletonError::Io { .. } => exit_codes::IO_FAILURE,
            SingletonError::InvalidName(_) => exit_codes::USER_ERROR,
            SingletonError::UserError(_) => exit_codes::USER_ERROR,
        }
    }

    /// True for the contention case.
    pub fn is_already_running(&self) -> bool {
        matches!(self, SingletonError::AlreadyRunning { .. })
    }
}

/// Result type alias for singleton-process operations.
pub type Result<T> = std::result::Result<T, SingletonError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn already_running_has_correct_exit_code() {
        let err = SingletonError::AlreadyRunning {
            name: "worker".to_string(),
            pid: Some(42),
        };
        assert_eq!(err.exit_code(), exit_codes::ALREADY_RUNNING);
        assert!(err.is_already_running());
    }

    #[test]
    fn io_error_has_correct_exit_code() {
        let err = SingletonError::io(
            "open marker",
            "/tmp/x.pid",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.exit_code(), exit_codes::IO_FAILURE);
        assert!(!err.is_already_running());
    }

    #[test]
    fn user_errors_have_correct_exit_code() {
        assert_eq!(
            SingletonError::InvalidName("a/b".to_string()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            SingletonError::UserError("bad".to_string()).exit_code(),
            exit_codes::USER_ERROR
        );
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = SingletonError::AlreadyRunning {
            name: "worker".to_string(),
            pid: Some(1234),
        };
        assert_eq!(err.to_string(), "worker is already running (pid 1234)");

        let err = SingletonError::AlreadyRunning {
            name: "worker".to_string(),
            pid: None,
        };
        assert_eq!(err.to_string(), "worker is already running");

        let err = SingletonError::io(
            "sync marker",
            "/var/run/w.pid",
            io::Error::other("disk full"),
        );
        assert_eq!(
            err.to_string(),
            "I/O error during sync marker on /var/run/w.pid: disk full"
        );
    }
}
