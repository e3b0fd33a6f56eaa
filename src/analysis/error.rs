use thiserror::Error;

use crate::scoring::ScoringError;

/// Errors from the group analyses.
///
/// Group-scoped variants skip one group; the drivers record the reason and
/// continue with the next group.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("group '{group}' has {actual} runs, needs at least {required}")]
    InsufficientData {
        group: String,
        required: usize,
        actual: usize,
    },

    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error("invalid sweep thresholds: {reason}")]
    InvalidThresholds { reason: String },

    #[error("reference count must be at least 1")]
    InvalidReferenceCount,
}
