use tracing::{debug, info};

use super::error::AnalysisError;
use super::stats::{SpreadStats, pass_rate};
use super::types::GroupOutcomes;
use crate::runs::{GroupKey, RunGroup};
use crate::scoring::{ConsistencyScorer, ScoringMethod};

#[derive(Debug, Clone, PartialEq)]
/// Pass rate for every choice of anchor within one group.
pub struct AnchorRotationResult {
    pub key: GroupKey,
    pub method: ScoringMethod,
    pub threshold: f32,
    /// One entry per run, in run order.
    pub pass_rates: Vec<f64>,
    pub stats: SpreadStats,
}

impl AnchorRotationResult {
    pub fn n_anchors(&self) -> usize {
        self.pass_rates.len()
    }
}

/// Rotates the anchor through every run of a group.
#[derive(Debug, Clone, Copy)]
pub struct AnchorRotationAnalyzer<'a> {
    scorer: ConsistencyScorer<'a>,
}

impl<'a> AnchorRotationAnalyzer<'a> {
    pub fn new(scorer: ConsistencyScorer<'a>) -> Self {
        Self { scorer }
    }

    /// Needs at least two runs. An anchor with no claims records a pass rate of 0.
    pub fn analyze_group(&self, group: &RunGroup) -> Result<AnchorRotationResult, AnalysisError> {
        let runs = group.runs();
        if runs.len() < 2 {
            return Err(AnalysisError::InsufficientData {
                group: group.label(),
                required: 2,
                actual: runs.len(),
            });
        }

        let extractor = self.scorer.extractor();
        let mut pass_rates = Vec::with_capacity(runs.len());

        for (anchor_idx, anchor) in runs.iter().enumerate() {
            let claims = extractor.extract(&anchor.response_text);
            if claims.is_empty() {
                debug!(group = %group.key(), anchor = anchor_idx, "Anchor has no claims");
                pass_rates.push(0.0);
                continue;
            }

            let references: Vec<&str> = runs
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != anchor_idx)
                .map(|(_, run)| run.response_text.as_str())
                .collect();

            let verdicts = self.scorer.score(&claims, &references)?;
            let n_factual = verdicts.iter().filter(|v| v.is_factual()).count();
            let rate = pass_rate(n_factual, verdicts.len());

            debug!(
                group = %group.key(),
                anchor = anchor_idx,
                run_id = %anchor.run_id,
                factual = n_factual,
                claims = verdicts.len(),
                pass_rate = rate,
                "Anchor scored"
            );
            pass_rates.push(rate);
        }

        let stats = SpreadStats::from_values(&pass_rates).ok_or_else(|| {
            AnalysisError::InsufficientData {
                group: group.label(),
                required: 2,
                actual: 0,
            }
        })?;

        info!(
            group = %group.key(),
            anchors = pass_rates.len(),
            mean = stats.mean,
            std = stats.std,
            range = stats.range,
            "Anchor rotation complete"
        );

        Ok(AnchorRotationResult {
            key: group.key().clone(),
            method: self.scorer.method(),
            threshold: self.scorer.threshold(),
            pass_rates,
            stats,
        })
    }

    pub fn analyze(&self, groups: &[RunGroup]) -> GroupOutcomes<AnchorRotationResult> {
        GroupOutcomes::collect(groups, |group| self.analyze_group(group))
    }
}

/// Mean and population std of the per-group mean pass rates.
pub fn summarize_means(results: &[AnchorRotationResult]) -> Option<(f64, f64)> {
    let means: Vec<f64> = results.iter().map(|r| r.stats.mean).collect();
    SpreadStats::from_values(&means).map(|stats| (stats.mean, stats.std))
}
