use std::collections::BTreeMap;

use tracing::info;

use super::types::{
    AnchorRotationReport, ClaimDetail, GroupReport, PassCounts, RotationReport, SinglePassReport,
    ThresholdReport, ThresholdSweepReport, round_to, threshold_key, threshold_value,
};
use crate::analysis::{AnchorRotationResult, GroupResult, ThresholdSweepResult, summarize_means};

/// Folds analysis results into serialisable reports.
///
/// Holds no scoring logic: every number here is either copied from a result or a
/// cross-group total.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResultAggregator;

impl ResultAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn single_pass(&self, results: &[GroupResult]) -> SinglePassReport {
        results
            .iter()
            .map(|result| {
                let report = GroupReport {
                    model: result.key.model.clone(),
                    scenario: result.key.scenario.clone(),
                    n_claims: result.n_claims(),
                    n_passed_as_factual: result.n_factual(),
                    n_flagged_as_hallucination: result.n_hallucination(),
                    pass_rate: PassCounts::new(result.n_factual(), result.n_claims()).pass_rate,
                    claim_details: result.verdicts.iter().map(ClaimDetail::from).collect(),
                };
                (result.key.label(), report)
            })
            .collect()
    }

    /// Claims passed as factual across all groups.
    pub fn single_pass_overall(&self, results: &[GroupResult]) -> PassCounts {
        let n_factual = results.iter().map(GroupResult::n_factual).sum();
        let n_claims = results.iter().map(GroupResult::n_claims).sum();
        let overall = PassCounts::new(n_factual, n_claims);

        info!(
            groups = results.len(),
            factual = overall.n_factual,
            claims = overall.n_claims,
            pass_rate = overall.pass_rate,
            "Single-pass overall"
        );

        overall
    }

    pub fn rotation(&self, results: &[AnchorRotationResult]) -> AnchorRotationReport {
        results
            .iter()
            .map(|result| {
                let report = RotationReport {
                    model: result.key.model.clone(),
                    scenario: result.key.scenario.clone(),
                    n_anchors: result.n_anchors(),
                    threshold: threshold_value(result.threshold),
                    per_anchor_pass_rates: result
                        .pass_rates
                        .iter()
                        .map(|&rate| round_to(rate, 3))
                        .collect(),
                    mean: round_to(result.stats.mean, 3),
                    std: round_to(result.stats.std, 3),
                    min: round_to(result.stats.min, 3),
                    max: round_to(result.stats.max, 3),
                    range: round_to(result.stats.range, 3),
                };
                (result.key.label(), report)
            })
            .collect()
    }

    /// Mean and population std of the per-group means, rounded to 3 decimals.
    pub fn rotation_overall(&self, results: &[AnchorRotationResult]) -> Option<(f64, f64)> {
        summarize_means(results).map(|(mean, std)| {
            info!(groups = results.len(), mean, std, "Anchor rotation overall");
            (round_to(mean, 3), round_to(std, 3))
        })
    }

    pub fn sweep(&self, result: &ThresholdSweepResult) -> ThresholdSweepReport {
        result
            .thresholds
            .iter()
            .enumerate()
            .map(|(idx, &threshold)| {
                let groups: BTreeMap<String, PassCounts> = result
                    .groups
                    .iter()
                    .filter_map(|group| {
                        group.points.get(idx).map(|point| {
                            (
                                group.key.label(),
                                PassCounts::new(point.n_factual, point.n_claims),
                            )
                        })
                    })
                    .collect();

                let overall = result.overall(idx);
                let report = ThresholdReport {
                    threshold: threshold_value(threshold),
                    groups,
                    overall: PassCounts::new(overall.n_factual, overall.n_claims),
                };
                (threshold_key(threshold), report)
            })
            .collect()
    }
}
