//! Fatal error types for the retention pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run before anything is listed or deleted.
///
/// Per-entry deletion problems are not errors; they are collected in the
/// report as [`crate::models::DeletionFailure`] values.
#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("No backup label (*.backup) found in {}", .0.display())]
    NoBackupFound(PathBuf),

    #[error("Failed to list {}: {source}", .path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using RetentionError
pub type Result<T> = std::result::Result<T, RetentionError>;

impl RetentionError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
