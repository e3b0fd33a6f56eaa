//! Cross-cutting, shared constants.
//!
//! Scoring thresholds, extraction limits and report formatting live here so the
//! scorer, the analyzers and the report layer agree on the same values.

/// Similarity cutoff for the semantic verdict (`avg_support > threshold`).
pub const DEFAULT_THRESHOLD: f32 = 0.65;

/// A sentence must be strictly longer than this (in chars) to count as a claim.
pub const MIN_CLAIM_CHARS: usize = 20;

/// Claims longer than this are truncated in reports (an ellipsis is appended).
pub const CLAIM_DISPLAY_CHARS: usize = 120;

/// Lexical mode only considers lowercase ASCII words at least this long.
pub const LEXICAL_MIN_TOKEN_LEN: usize = 4;

/// Lexical mode: a reference supports a claim above this token overlap ratio.
pub const LEXICAL_OVERLAP_THRESHOLD: f32 = 0.3;

/// Lexical mode: a claim is factual above this fraction of supporting references.
pub const LEXICAL_SUPPORT_RATE_THRESHOLD: f64 = 0.5;

/// Reference pool size for the single-pass analysis.
pub const DEFAULT_N_REFERENCE: usize = 5;

/// Reference pool size for threshold sweeps.
pub const DEFAULT_SWEEP_N_REFERENCE: usize = 19;

/// Thresholds swept when none are configured (ascending).
pub const DEFAULT_SWEEP_THRESHOLDS: [f32; 7] = [0.50, 0.55, 0.60, 0.65, 0.70, 0.75, 0.80];

/// Output dimension of all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens per sentence fed to the encoder.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Max memoised embeddings kept by [`crate::embedding::CachedEmbedder`].
pub const DEFAULT_EMBED_CACHE_CAPACITY: u64 = 50_000;

/// File name prefix of stochastic run files.
pub const DEFAULT_RUN_PREFIX: &str = "PPH-001-";

/// Marker identifying stochastic runs in file names and run ids.
pub const DEFAULT_STOCH_MARKER: &str = "STOCH";

/// Placeholder written for claims awaiting manual ground-truth review.
pub const GROUND_TRUTH_PLACEHOLDER: &str = "UNKNOWN";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep_thresholds_ascending() {
        assert!(
            DEFAULT_SWEEP_THRESHOLDS
                .windows(2)
                .all(|pair| pair[0] < pair[1])
        );
    }

    #[test]
    fn test_default_threshold_is_swept() {
        assert!(DEFAULT_SWEEP_THRESHOLDS.contains(&DEFAULT_THRESHOLD));
    }

    #[test]
    fn test_lexical_cutoffs_are_ratios() {
        assert!((0.0..=1.0).contains(&LEXICAL_OVERLAP_THRESHOLD));
        assert!((0.0..=1.0).contains(&LEXICAL_SUPPORT_RATE_THRESHOLD));
    }
}
