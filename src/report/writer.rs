use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::error::ReportError;
use crate::analysis::SkippedGroup;
use crate::scoring::ScoringMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    SinglePass,
    AnchorRotation,
    ThresholdSweep,
}

impl AnalysisKind {
    /// Report file name used when no output path is configured.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            AnalysisKind::SinglePass => "selfcheckgpt_results.json",
            AnalysisKind::AnchorRotation => "selfcheckgpt_anchor_rotation.json",
            AnalysisKind::ThresholdSweep => "selfcheckgpt_threshold_sweep.json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub group: String,
    pub reason: String,
}

impl From<&SkippedGroup> for SkippedEntry {
    fn from(skipped: &SkippedGroup) -> Self {
        Self {
            group: skipped.key.label(),
            reason: skipped.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Sidecar describing how a report was produced.
pub struct ReportMetadata {
    pub analysis: AnalysisKind,
    pub method: ScoringMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_reference: Option<usize>,
    pub n_groups: usize,
    pub skipped_groups: Vec<SkippedEntry>,
    pub generated_at: DateTime<Utc>,
}

impl ReportMetadata {
    pub fn new(analysis: AnalysisKind, method: ScoringMethod) -> Self {
        Self {
            analysis,
            method,
            threshold: None,
            thresholds: None,
            n_reference: None,
            n_groups: 0,
            skipped_groups: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_thresholds(mut self, thresholds: &[f32]) -> Self {
        self.thresholds = Some(thresholds.to_vec());
        self
    }

    pub fn with_n_reference(mut self, n_reference: usize) -> Self {
        self.n_reference = Some(n_reference);
        self
    }

    pub fn with_groups(mut self, n_groups: usize, skipped: &[SkippedGroup]) -> Self {
        self.n_groups = n_groups;
        self.skipped_groups = skipped.iter().map(SkippedEntry::from).collect();
        self
    }
}

/// Sidecar path: `report.json` → `report.meta.json`.
pub fn metadata_path(report_path: &Path) -> PathBuf {
    report_path.with_extension("meta.json")
}

/// Writes the report as pretty JSON plus its metadata sidecar.
///
/// Returns the sidecar path.
pub fn write_report<T: Serialize>(
    report_path: &Path,
    report: &T,
    metadata: &ReportMetadata,
) -> Result<PathBuf, ReportError> {
    write_json(report_path, report)?;

    let meta_path = metadata_path(report_path);
    write_json(&meta_path, metadata)?;

    info!(
        path = %report_path.display(),
        metadata = %meta_path.display(),
        method = %metadata.method,
        groups = metadata.n_groups,
        skipped = metadata.skipped_groups.len(),
        "Report written"
    );

    Ok(meta_path)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
