//! SelfCheck audit library crate (used by the `selfcheck` binary and integration tests).
//!
//! Measures how often claims from a confabulated response pass a
//! SelfCheckGPT-style cross-sample consistency check.
//!
//! # Public API Surface
//!
//! ## Inputs
//! - [`Run`], [`RunLoader`], [`group_runs`] - Validated run records and grouping
//! - [`ClaimExtractor`] - Sentence-level claim extraction
//!
//! ## Embedding & Scoring
//! - [`EmbeddingProvider`] - The embedding seam; [`SentenceEmbedder`] and
//!   [`CachedEmbedder`] implement it
//! - [`ScoringStrategy`], [`ConsistencyScorer`] - Semantic or lexical support scoring
//!
//! ## Analyses
//! - [`SinglePassAnalyzer`], [`AnchorRotationAnalyzer`], [`ThresholdSweepAnalyzer`]
//!
//! ## Output
//! - [`ResultAggregator`], [`write_report`] - JSON reports and summary tables
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - Environment-backed settings

pub mod analysis;
pub mod claims;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod report;
pub mod runs;
pub mod scoring;

pub use analysis::{
    AnalysisError, AnchorRotationAnalyzer, AnchorRotationResult, GroupOutcomes, GroupResult,
    SinglePassAnalyzer, SkippedGroup, SpreadStats, ThresholdSweepAnalyzer, ThresholdSweepResult,
};
pub use claims::{Claim, ClaimExtractor};
pub use config::{Config, ConfigError, EmbedderMode};
pub use constants::{DEFAULT_N_REFERENCE, DEFAULT_SWEEP_N_REFERENCE, DEFAULT_THRESHOLD};
pub use embedding::{
    CachedEmbedder, EmbeddingError, EmbeddingProvider, SentenceConfig, SentenceEmbedder,
    available_provider, cosine_similarity, load_provider,
};
pub use hashing::{hash_text, hash_to_u64, token_bucket};
pub use report::{
    AnalysisKind, ReportError, ReportMetadata, ResultAggregator, metadata_path, write_report,
};
pub use runs::{GroupKey, LoadedRuns, Run, RunError, RunFilter, RunGroup, RunLoader, group_runs};
pub use scoring::{
    ClaimScores, ClaimVerdict, ConsistencyScorer, ScoringError, ScoringMethod, ScoringStrategy,
    Verdict,
};
