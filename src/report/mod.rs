//! Report assembly and output.
//!
//! [`ResultAggregator`] folds analysis results into the JSON report shapes (keyed by
//! group label or threshold), [`write_report`] persists them next to a metadata
//! sidecar, and [`table`] renders the console summaries.

pub mod aggregator;
pub mod error;
pub mod table;
pub mod types;
pub mod writer;

#[cfg(test)]
mod tests;

pub use aggregator::ResultAggregator;
pub use error::ReportError;
pub use table::{rotation_table, single_pass_table, sweep_table};
pub use types::{
    AnchorRotationReport, ClaimDetail, GroupReport, PassCounts, RotationReport, SinglePassReport,
    ThresholdReport, ThresholdSweepReport, display_claim, round_to, threshold_key,
    threshold_value,
};
pub use writer::{AnalysisKind, ReportMetadata, SkippedEntry, metadata_path, write_report};
