//! Run loading error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading and validating run records.
///
/// Record-level variants reject a single record; the loader logs them and keeps
/// going. Only [`RunError::DirectoryUnreadable`] aborts a load.
#[derive(Debug, Error)]
pub enum RunError {
    /// A required field is absent (or `null`).
    #[error("run record is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A required field is present but empty after trimming.
    #[error("run record field '{field}' is empty")]
    EmptyField { field: &'static str },

    /// The record is not valid JSON or a field has the wrong type.
    #[error("malformed run record: {reason}")]
    Malformed { reason: String },

    /// A run file could not be read.
    #[error("failed to read run file {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run directory could not be listed.
    #[error("failed to read run directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for RunError {
    fn from(err: serde_json::Error) -> Self {
        RunError::Malformed {
            reason: err.to_string(),
        }
    }
}
