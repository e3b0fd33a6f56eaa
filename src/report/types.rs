use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::{CLAIM_DISPLAY_CHARS, GROUND_TRUTH_PLACEHOLDER};
use crate::scoring::{ClaimVerdict, ScoringMethod, Verdict};

/// Rounds to `places` decimals, ties to even (`0.125` → `0.12`).
///
/// Reports carry `f64` so a rounded value serialises as its short decimal form.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// A configured threshold as a report value (`0.65f32` → `0.65`).
pub fn threshold_value(threshold: f32) -> f64 {
    round_to(f64::from(threshold), 6)
}

/// Claim text for reports: the first 120 chars plus `...` when longer.
pub fn display_claim(claim: &str) -> String {
    if claim.chars().count() > CLAIM_DISPLAY_CHARS {
        let truncated: String = claim.chars().take(CLAIM_DISPLAY_CHARS).collect();
        format!("{}...", truncated)
    } else {
        claim.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One claim in the single-pass report.
///
/// Semantic scoring fills `avg_bertscore` and `n_samples_supporting`; lexical
/// scoring fills `keyword_overlap_support` instead.
pub struct ClaimDetail {
    pub claim: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_bertscore: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_overlap_support: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_samples_supporting: Option<usize>,
    pub n_samples_total: usize,
    pub support_rate: f64,
    pub selfcheckgpt_verdict: Verdict,
    pub pph_ground_truth: String,
}

impl From<&ClaimVerdict> for ClaimDetail {
    fn from(verdict: &ClaimVerdict) -> Self {
        let semantic = verdict.method == ScoringMethod::Semantic;

        Self {
            claim: display_claim(&verdict.claim),
            avg_bertscore: semantic.then(|| round_to(f64::from(verdict.avg_support), 3)),
            keyword_overlap_support: (!semantic).then_some(verdict.n_supporting),
            n_samples_supporting: semantic.then_some(verdict.n_supporting),
            n_samples_total: verdict.n_references,
            support_rate: round_to(verdict.support_rate, 2),
            selfcheckgpt_verdict: verdict.verdict,
            pph_ground_truth: GROUND_TRUTH_PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Single-pass result for one group.
pub struct GroupReport {
    pub model: String,
    pub scenario: String,
    pub n_claims: usize,
    pub n_passed_as_factual: usize,
    pub n_flagged_as_hallucination: usize,
    pub pass_rate: f64,
    pub claim_details: Vec<ClaimDetail>,
}

/// Group label → single-pass result.
pub type SinglePassReport = BTreeMap<String, GroupReport>;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Anchor rotation result for one group.
pub struct RotationReport {
    pub model: String,
    pub scenario: String,
    pub n_anchors: usize,
    pub threshold: f64,
    pub per_anchor_pass_rates: Vec<f64>,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

/// Group label → rotation result.
pub type AnchorRotationReport = BTreeMap<String, RotationReport>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Factual count, claim count and pass rate.
pub struct PassCounts {
    pub n_factual: usize,
    pub n_claims: usize,
    pub pass_rate: f64,
}

impl PassCounts {
    /// Pass rate is `n_factual / max(n_claims, 1)`, rounded to 3 decimals.
    pub fn new(n_factual: usize, n_claims: usize) -> Self {
        Self {
            n_factual,
            n_claims,
            pass_rate: round_to(n_factual as f64 / n_claims.max(1) as f64, 3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Every group at one threshold.
pub struct ThresholdReport {
    pub threshold: f64,
    pub groups: BTreeMap<String, PassCounts>,
    pub overall: PassCounts,
}

/// `"0.65"`-style threshold key → results at that threshold.
pub type ThresholdSweepReport = BTreeMap<String, ThresholdReport>;

/// Key used for a threshold in the sweep report.
pub fn threshold_key(threshold: f32) -> String {
    format!("{:.2}", threshold)
}
