//! Error types for unexpected validation failures.
//!
//! Missing roots, missing aggregators and dangling exports are reported as
//! data inside [`ValidationResult`](crate::models::ValidationResult). The
//! variants here cover conditions that mean the run itself could not finish.

use std::path::PathBuf;

/// Hard failure while validating an export surface.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// A file or directory that exists could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed below the scan root.
    #[error("Failed to walk module directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The caller raised the cancellation flag during traversal.
    #[error("Validation cancelled")]
    Cancelled,
}

impl ValidateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
