use serde::Serialize;

use crate::constants::{LEXICAL_OVERLAP_THRESHOLD, LEXICAL_SUPPORT_RATE_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
/// Consistency verdict for one claim.
pub enum Verdict {
    /// The references corroborate the claim.
    #[serde(rename = "LIKELY_FACTUAL")]
    Factual,
    /// The references do not corroborate the claim.
    #[serde(rename = "LIKELY_HALLUCINATION")]
    Hallucination,
}

impl Verdict {
    pub fn is_factual(&self) -> bool {
        matches!(self, Verdict::Factual)
    }

    /// Label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Factual => "LIKELY_FACTUAL",
            Verdict::Hallucination => "LIKELY_HALLUCINATION",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// How support scores were computed.
pub enum ScoringMethod {
    /// Embedding cosine similarity against reference claims.
    Semantic,
    /// Content-word overlap against whole reference texts.
    Lexical,
}

impl ScoringMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMethod::Semantic => "semantic",
            ScoringMethod::Lexical => "lexical",
        }
    }
}

impl std::fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A claim with its raw support scores, one per contributing reference.
///
/// In semantic mode references without claims are absent from `support_scores`;
/// in lexical mode every reference text is present.
pub struct ClaimScores {
    pub claim: String,
    pub method: ScoringMethod,
    pub support_scores: Vec<f32>,
}

impl ClaimScores {
    pub fn new(claim: impl Into<String>, method: ScoringMethod, support_scores: Vec<f32>) -> Self {
        Self {
            claim: claim.into(),
            method,
            support_scores,
        }
    }

    /// References that contributed a score (the denominator of `support_rate`).
    pub fn n_references(&self) -> usize {
        self.support_scores.len()
    }

    /// Mean support score, `0.0` when no reference contributed.
    pub fn avg_support(&self) -> f32 {
        if self.support_scores.is_empty() {
            return 0.0;
        }
        self.support_scores.iter().sum::<f32>() / self.support_scores.len() as f32
    }

    /// Number of scores strictly above `cutoff`.
    pub fn count_above(&self, cutoff: f32) -> usize {
        self.support_scores.iter().filter(|&&s| s > cutoff).count()
    }

    /// Classifies the claim at `threshold`.
    ///
    /// Semantic scores are gated on `avg_support > threshold`. Lexical scores use
    /// their fixed overlap cutoff and majority rule, so `threshold` does not apply.
    pub fn classify(&self, threshold: f32) -> ClaimVerdict {
        let avg_support = self.avg_support();
        let n_references = self.n_references();

        let (n_supporting, verdict) = match self.method {
            ScoringMethod::Semantic => {
                let factual = avg_support > threshold;
                (self.count_above(threshold), factual)
            }
            ScoringMethod::Lexical => {
                let n_supporting = self.count_above(LEXICAL_OVERLAP_THRESHOLD);
                let factual =
                    support_rate(n_supporting, n_references) > LEXICAL_SUPPORT_RATE_THRESHOLD;
                (n_supporting, factual)
            }
        };

        ClaimVerdict {
            claim: self.claim.clone(),
            method: self.method,
            avg_support,
            n_supporting,
            n_references,
            support_rate: support_rate(n_supporting, n_references),
            verdict: if verdict {
                Verdict::Factual
            } else {
                Verdict::Hallucination
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A classified claim.
pub struct ClaimVerdict {
    pub claim: String,
    pub method: ScoringMethod,
    /// Mean support score (cosine similarity or token overlap).
    pub avg_support: f32,
    /// References whose score cleared the per-reference cutoff.
    pub n_supporting: usize,
    /// References that contributed a score.
    pub n_references: usize,
    /// `n_supporting / n_references`, `0.0` when there are no references.
    pub support_rate: f64,
    pub verdict: Verdict,
}

impl ClaimVerdict {
    pub fn is_factual(&self) -> bool {
        self.verdict.is_factual()
    }
}

fn support_rate(n_supporting: usize, n_references: usize) -> f64 {
    if n_references == 0 {
        0.0
    } else {
        n_supporting as f64 / n_references as f64
    }
}
