//! Group-level analyses built on the consistency scorer.
//!
//! - [`SinglePassAnalyzer`]: one target per group, a fixed reference pool.
//! - [`AnchorRotationAnalyzer`]: every run takes a turn as the target.
//! - [`ThresholdSweepAnalyzer`]: scores once, reclassifies at many thresholds.
//!
//! Each analyzer processes groups independently. A group that is too small, or
//! whose scoring fails, is recorded in [`GroupOutcomes::skipped`] and the rest
//! continue.

pub mod error;
pub mod rotation;
pub mod single_pass;
pub mod stats;
pub mod sweep;
pub mod types;


pub use error::AnalysisError;
pub use rotation::{AnchorRotationAnalyzer, AnchorRotationResult, summarize_means};
pub use single_pass::SinglePassAnalyzer;
pub use stats::{SpreadStats, pass_rate};
pub use sweep::{SweepGroup, SweepPoint, ThresholdSweepAnalyzer, ThresholdSweepResult};
pub use types::{GroupOutcomes, GroupResult, SkippedGroup};
