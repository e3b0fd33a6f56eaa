//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Threshold string could not be parsed as a number.
    #[error("failed to parse threshold '{value}': {source}")]
    ThresholdParseError {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Threshold is outside `0.0..=1.0`.
    #[error("invalid threshold {value}: must be between 0.0 and 1.0")]
    InvalidThreshold { value: f32 },

    /// Sweep thresholds are empty or not strictly ascending.
    #[error("invalid sweep thresholds: {reason}")]
    InvalidSweepThresholds { reason: String },

    /// Reference count must be at least 1.
    #[error("invalid reference count for {setting}: must be at least 1")]
    InvalidReferenceCount { setting: &'static str },

    /// Unknown embedder mode.
    #[error("invalid embedder mode '{value}': expected one of auto, stub, lexical")]
    InvalidEmbedderMode { value: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
