//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! rules. Business rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A staged write could not be committed.
    #[error("Write failed for {path}: {reason}")]
    WriteFailure { path: PathBuf, reason: String },

    /// Restoring a file after a failed transaction failed too.
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },

    /// Shared in-memory state was poisoned by a panicking thread.
    #[error("Internal lock poisoned")]
    LockPoisoned,

    /// The external migration tool could not be started.
    #[error("Migration failed: {reason}")]
    MigrationFailed { reason: String },
}

impl ApplicationError {
    /// Shorthand for [`ApplicationError::FilesystemError`].
    pub fn filesystem(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read and write permissions".into(),
            ],
            Self::WriteFailure { path, .. } => vec![
                format!("Could not write {}", path.display()),
                "No file was changed; the operation was rolled back".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("{} may be left in an intermediate state", path.display()),
                "Look for leftover .tmp files next to it".into(),
                "Restore the file from version control".into(),
            ],
            Self::LockPoisoned => vec!["Try again; restart the process if it persists".into()],
            Self::MigrationFailed { .. } => vec![
                "Make sure the Go toolchain is installed and on PATH".into(),
                "Run `go run ./cmd/migrate` manually to see the full output".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. }
            | Self::WriteFailure { .. }
            | Self::RollbackFailed { .. }
            | Self::LockPoisoned
            | Self::MigrationFailed { .. } => ErrorCategory::Internal,
        }
    }
}
