use tracing::{debug, info};

use super::error::AnalysisError;
use super::stats::pass_rate;
use super::types::GroupOutcomes;
use crate::constants::{DEFAULT_SWEEP_N_REFERENCE, DEFAULT_SWEEP_THRESHOLDS};
use crate::runs::{GroupKey, RunGroup};
use crate::scoring::{ClaimScores, ConsistencyScorer, ScoringMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Factual count at one threshold.
pub struct SweepPoint {
    pub n_factual: usize,
    pub n_claims: usize,
}

impl SweepPoint {
    pub fn pass_rate(&self) -> f64 {
        pass_rate(self.n_factual, self.n_claims)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One group's raw claim scores and their classification at every threshold.
pub struct SweepGroup {
    pub key: GroupKey,
    pub method: ScoringMethod,
    pub claim_scores: Vec<ClaimScores>,
    /// Parallel to the analyzer's thresholds.
    pub points: Vec<SweepPoint>,
}

#[derive(Debug, Clone, PartialEq)]
/// Sweep over all groups.
pub struct ThresholdSweepResult {
    pub thresholds: Vec<f32>,
    pub groups: Vec<SweepGroup>,
}

impl ThresholdSweepResult {
    /// Totals across groups at the threshold with index `idx`.
    pub fn overall(&self, idx: usize) -> SweepPoint {
        self.groups
            .iter()
            .filter_map(|group| group.points.get(idx))
            .fold(
                SweepPoint {
                    n_factual: 0,
                    n_claims: 0,
                },
                |acc, point| SweepPoint {
                    n_factual: acc.n_factual + point.n_factual,
                    n_claims: acc.n_claims + point.n_claims,
                },
            )
    }
}

/// Scores each group once, then reclassifies at every threshold.
#[derive(Debug, Clone)]
pub struct ThresholdSweepAnalyzer<'a> {
    scorer: ConsistencyScorer<'a>,
    thresholds: Vec<f32>,
    n_reference: usize,
}

impl<'a> ThresholdSweepAnalyzer<'a> {
    /// `thresholds` must be non-empty, strictly ascending and within `0.0..=1.0`.
    pub fn new(
        scorer: ConsistencyScorer<'a>,
        thresholds: Vec<f32>,
        n_reference: usize,
    ) -> Result<Self, AnalysisError> {
        validate_thresholds(&thresholds)?;
        if n_reference == 0 {
            return Err(AnalysisError::InvalidReferenceCount);
        }

        Ok(Self {
            scorer,
            thresholds,
            n_reference,
        })
    }

    /// Default thresholds and reference count.
    pub fn with_defaults(scorer: ConsistencyScorer<'a>) -> Self {
        Self {
            scorer,
            thresholds: DEFAULT_SWEEP_THRESHOLDS.to_vec(),
            n_reference: DEFAULT_SWEEP_N_REFERENCE,
        }
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    pub fn n_reference(&self) -> usize {
        self.n_reference
    }

    /// Needs `n_reference + 1` runs: the first is the target, the next
    /// `n_reference` are references.
    pub fn analyze_group(&self, group: &RunGroup) -> Result<SweepGroup, AnalysisError> {
        let runs = group.runs();
        let required = self.n_reference + 1;
        if runs.len() < required {
            return Err(AnalysisError::InsufficientData {
                group: group.label(),
                required,
                actual: runs.len(),
            });
        }

        let target = &runs[0];
        let references: Vec<&str> = runs[1..required]
            .iter()
            .map(|run| run.response_text.as_str())
            .collect();

        let claims = self.scorer.extractor().extract(&target.response_text);
        debug!(
            group = %group.key(),
            claims = claims.len(),
            references = references.len(),
            "Computing sweep support scores"
        );

        let claim_scores = self.scorer.score_claims(&claims, &references)?;
        let points = self.reclassify(&claim_scores);

        Ok(SweepGroup {
            key: group.key().clone(),
            method: self.scorer.method(),
            claim_scores,
            points,
        })
    }

    /// Classifies precomputed scores at every threshold without rescoring.
    pub fn reclassify(&self, claim_scores: &[ClaimScores]) -> Vec<SweepPoint> {
        self.thresholds
            .iter()
            .map(|&threshold| SweepPoint {
                n_factual: claim_scores
                    .iter()
                    .filter(|scores| scores.classify(threshold).is_factual())
                    .count(),
                n_claims: claim_scores.len(),
            })
            .collect()
    }

    /// Sweeps every eligible group.
    pub fn analyze(&self, groups: &[RunGroup]) -> GroupOutcomes<SweepGroup> {
        let outcomes = GroupOutcomes::collect(groups, |group| self.analyze_group(group));

        info!(
            groups = outcomes.completed.len(),
            skipped = outcomes.skipped.len(),
            thresholds = self.thresholds.len(),
            "Threshold sweep complete"
        );

        outcomes
    }

    /// Bundles completed groups with the thresholds they were classified at.
    pub fn collect_result(&self, groups: Vec<SweepGroup>) -> ThresholdSweepResult {
        ThresholdSweepResult {
            thresholds: self.thresholds.clone(),
            groups,
        }
    }
}

fn validate_thresholds(thresholds: &[f32]) -> Result<(), AnalysisError> {
    if thresholds.is_empty() {
        return Err(AnalysisError::InvalidThresholds {
            reason: "no thresholds given".to_string(),
        });
    }

    if let Some(bad) = thresholds.iter().find(|t| !(0.0..=1.0).contains(*t)) {
        return Err(AnalysisError::InvalidThresholds {
            reason: format!("{} is outside 0.0..=1.0", bad),
        });
    }

    if !thresholds.windows(2).all(|pair| pair[0] < pair[1]) {
        return Err(AnalysisError::InvalidThresholds {
            reason: "thresholds must be strictly ascending".to_string(),
        });
    }

    Ok(())
}
