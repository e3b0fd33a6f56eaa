use tracing::{debug, info};

use super::error::AnalysisError;
use super::types::{GroupOutcomes, GroupResult};
use crate::constants::DEFAULT_N_REFERENCE;
use crate::runs::{Run, RunGroup};
use crate::scoring::ConsistencyScorer;

/// First run as target, up to the next `n_reference` runs as references.
#[derive(Debug, Clone, Copy)]
pub struct SinglePassAnalyzer<'a> {
    scorer: ConsistencyScorer<'a>,
    n_reference: usize,
}

impl<'a> SinglePassAnalyzer<'a> {
    pub fn new(scorer: ConsistencyScorer<'a>, n_reference: usize) -> Result<Self, AnalysisError> {
        if n_reference == 0 {
            return Err(AnalysisError::InvalidReferenceCount);
        }
        Ok(Self {
            scorer,
            n_reference,
        })
    }

    /// Analyzer with the default reference count.
    pub fn with_defaults(scorer: ConsistencyScorer<'a>) -> Self {
        Self {
            scorer,
            n_reference: DEFAULT_N_REFERENCE,
        }
    }

    pub fn n_reference(&self) -> usize {
        self.n_reference
    }

    /// Scores one group. Needs at least two runs.
    pub fn analyze_group(&self, group: &RunGroup) -> Result<GroupResult, AnalysisError> {
        let runs = group.runs();
        if runs.len() < 2 {
            return Err(AnalysisError::InsufficientData {
                group: group.label(),
                required: 2,
                actual: runs.len(),
            });
        }

        let target = &runs[0];
        let last = self.n_reference.min(runs.len() - 1);
        let references: Vec<&Run> = runs[1..=last].iter().collect();

        debug!(
            group = %group.key(),
            target = %target.run_id,
            references = references.len(),
            "Single-pass scoring"
        );

        let verdicts = self.scorer.score_target(target, &references)?;

        let result = GroupResult {
            key: group.key().clone(),
            method: self.scorer.method(),
            threshold: self.scorer.threshold(),
            target_run_id: target.run_id.clone(),
            n_references: references.len(),
            verdicts,
        };

        info!(
            group = %result.key,
            claims = result.n_claims(),
            factual = result.n_factual(),
            pass_rate = result.pass_rate(),
            "Single-pass group scored"
        );

        Ok(result)
    }

    /// Scores every group; undersized or failing groups are skipped.
    pub fn analyze(&self, groups: &[RunGroup]) -> GroupOutcomes<GroupResult> {
        GroupOutcomes::collect(groups, |group| self.analyze_group(group))
    }
}
