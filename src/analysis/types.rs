use tracing::warn;

use super::error::AnalysisError;
use super::stats::pass_rate;
use crate::runs::{GroupKey, RunGroup};
use crate::scoring::{ClaimVerdict, ScoringMethod};

#[derive(Debug, Clone, PartialEq)]
/// Verdicts for one group's target run.
pub struct GroupResult {
    pub key: GroupKey,
    pub method: ScoringMethod,
    pub threshold: f32,
    /// `run_id` of the target run.
    pub target_run_id: String,
    /// Reference runs handed to the scorer.
    pub n_references: usize,
    pub verdicts: Vec<ClaimVerdict>,
}

impl GroupResult {
    pub fn n_claims(&self) -> usize {
        self.verdicts.len()
    }

    pub fn n_factual(&self) -> usize {
        self.verdicts.iter().filter(|v| v.is_factual()).count()
    }

    pub fn n_hallucination(&self) -> usize {
        self.n_claims() - self.n_factual()
    }

    /// Factual share of claims, `0.0` with no claims.
    pub fn pass_rate(&self) -> f64 {
        pass_rate(self.n_factual(), self.n_claims())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A group left out of an analysis, with the reason.
pub struct SkippedGroup {
    pub key: GroupKey,
    pub reason: String,
}

#[derive(Debug, Clone)]
/// Per-group results of one analysis over many groups.
pub struct GroupOutcomes<T> {
    pub completed: Vec<T>,
    pub skipped: Vec<SkippedGroup>,
}

impl<T> Default for GroupOutcomes<T> {
    fn default() -> Self {
        Self {
            completed: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> GroupOutcomes<T> {
    /// Runs `analyze` on every group, recording failures as skipped groups.
    pub(crate) fn collect<F>(groups: &[RunGroup], mut analyze: F) -> Self
    where
        F: FnMut(&RunGroup) -> Result<T, AnalysisError>,
    {
        let mut outcomes = Self::default();

        for group in groups {
            match analyze(group) {
                Ok(result) => outcomes.completed.push(result),
                Err(e) => {
                    warn!(group = %group.key(), error = %e, "Skipping group");
                    outcomes.skipped.push(SkippedGroup {
                        key: group.key().clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        outcomes
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}
