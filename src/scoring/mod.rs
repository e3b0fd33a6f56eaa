//! Cross-sample consistency scoring.
//!
//! A claim from a target response is checked against reference responses sampled
//! for the same prompt. Claims the references keep repeating are judged factual;
//! claims they do not corroborate are flagged as likely hallucinations.
//!
//! # Strategies
//!
//! The [`ScoringStrategy`] is picked once per invocation:
//!
//! - [`ScoringStrategy::Semantic`]: each reference contributes the max cosine
//!   similarity between the claim and any of the reference's claims (its support
//!   score). The verdict is `avg_support > threshold`.
//! - [`ScoringStrategy::Lexical`]: used only when no embedding provider is
//!   available. Each reference text contributes the fraction of the claim's content
//!   words it contains; the verdict is a majority of references above
//!   [`LEXICAL_OVERLAP_THRESHOLD`](crate::constants::LEXICAL_OVERLAP_THRESHOLD).
//!
//! Raw per-reference scores are kept in [`ClaimScores`] so a threshold sweep can
//! reclassify without touching the embedder again.

pub mod error;
pub mod lexical;
pub mod scorer;
pub mod strategy;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ScoringError;
pub use scorer::ConsistencyScorer;
pub use strategy::ScoringStrategy;
pub use types::{ClaimScores, ClaimVerdict, ScoringMethod, Verdict};
