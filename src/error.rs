//! Error types for the solo CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error
//! messages. The two acquisition failures are deliberately distinct: "another
//! instance is running" and "could not even attempt the lock" call for
//! different remediation, so they carry different messages and exit codes.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for solo operations.
#[derive(Error, Debug)]
pub enum SoloError {
    /// The lock is held by another process. This is the expected, common
    /// failure for a second launch.
    #[error("another instance is already running (lock held on '{0}')")]
    AlreadyRunning(String),

    /// The lock could not be attempted at all: the underlying file or socket
    /// could not be created or opened.
    #[error("failed to acquire instance lock: {0}")]
    Acquire(String),

    /// Best-effort release cleanup failed. Never fatal; callers log this and
    /// continue, since the kernel releases the lock on process exit anyway.
    #[error("failed to release instance lock: {0}")]
    Release(String),
}

impl SoloError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SoloError::AlreadyRunning(_) => exit_codes::ALREADY_RUNNING,
            SoloError::Acquire(_) => exit_codes::ACQUIRE_FAILURE,
            SoloError::Release(_) => exit_codes::RELEASE_FAILURE,
        }
    }
}

/// Result type alias for solo operations.
pub type Result<T> = std::result::Result<T, SoloError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_running_error_has_correct_exit_code() {
        let err = SoloError::AlreadyRunning("/tmp/solo.lock".to_string());
        assert_eq!(err.exit_code(), exit_codes::ALREADY_RUNNING);
    }

    #[test]
    fn acquire_error_has_correct_exit_code() {
        let err = SoloError::Acquire("permission denied".to_string());
        assert_eq!(err.exit_code(), exit_codes::ACQUIRE_FAILURE);
    }

    #[test]
    fn release_error_has_correct_exit_code() {
        let err = SoloError::Release("unlink failed".to_string());
        assert_eq!(err.exit_code(), exit_codes::RELEASE_FAILURE);
    }

    #[test]
    fn error_messages_distinguish_failure_modes() {
        let held = SoloError::AlreadyRunning("/tmp/solo.lock".to_string());
        assert!(held.to_string().contains("already running"));

        let env = SoloError::Acquire("permission denied".to_string());
        assert!(env.to_string().contains("failed to acquire"));
        assert!(!env.to_string().contains("already running"));
    }
}
