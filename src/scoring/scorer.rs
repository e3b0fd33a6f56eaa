use tracing::debug;

use crate::claims::ClaimExtractor;
use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::runs::Run;

use super::error::ScoringError;
use super::lexical::{content_words, overlap_ratio};
use super::strategy::ScoringStrategy;
use super::types::{ClaimScores, ClaimVerdict, ScoringMethod};

/// Scores target claims against reference responses.
///
/// Pure computation over its inputs: the strategy (and any embedding provider it
/// borrows) is fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyScorer<'a> {
    strategy: ScoringStrategy<'a>,
    extractor: ClaimExtractor,
    threshold: f32,
}

impl<'a> ConsistencyScorer<'a> {
    pub fn new(strategy: ScoringStrategy<'a>, threshold: f32) -> Result<Self, ScoringError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ScoringError::InvalidThreshold { value: threshold });
        }

        Ok(Self {
            strategy,
            extractor: ClaimExtractor::default(),
            threshold,
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn method(&self) -> ScoringMethod {
        self.strategy.method()
    }

    pub fn extractor(&self) -> &ClaimExtractor {
        &self.extractor
    }

    /// Raw support scores for each claim (same order as `claims`).
    pub fn score_claims(
        &self,
        claims: &[String],
        references: &[&str],
    ) -> Result<Vec<ClaimScores>, ScoringError> {
        if claims.is_empty() {
            return Ok(Vec::new());
        }

        match self.strategy {
            ScoringStrategy::Semantic(provider) => {
                self.semantic_scores(provider, claims, references)
            }
            ScoringStrategy::Lexical => Ok(lexical_scores(claims, references)),
        }
    }

    /// Scores and classifies each claim at the configured threshold.
    pub fn score(
        &self,
        claims: &[String],
        references: &[&str],
    ) -> Result<Vec<ClaimVerdict>, ScoringError> {
        Ok(self
            .score_claims(claims, references)?
            .iter()
            .map(|scores| scores.classify(self.threshold))
            .collect())
    }

    /// Extracts the target's claims and scores them against the reference runs.
    pub fn score_target(
        &self,
        target: &Run,
        references: &[&Run],
    ) -> Result<Vec<ClaimVerdict>, ScoringError> {
        let claims = self.extractor.extract(&target.response_text);
        let reference_texts: Vec<&str> = references
            .iter()
            .map(|run| run.response_text.as_str())
            .collect();

        self.score(&claims, &reference_texts)
    }

    fn semantic_scores(
        &self,
        provider: &dyn EmbeddingProvider,
        claims: &[String],
        references: &[&str],
    ) -> Result<Vec<ClaimScores>, ScoringError> {
        let claim_texts: Vec<&str> = claims.iter().map(String::as_str).collect();
        let claim_vectors = embed_checked(provider, &claim_texts)?;

        let mut support: Vec<Vec<f32>> = vec![Vec::with_capacity(references.len()); claims.len()];

        for (ref_idx, reference) in references.iter().enumerate() {
            let ref_claims = self.extractor.extract(reference);
            if ref_claims.is_empty() {
                debug!(reference = ref_idx, "Reference has no claims, excluded");
                continue;
            }

            let ref_texts: Vec<&str> = ref_claims.iter().map(String::as_str).collect();
            let ref_vectors = embed_checked(provider, &ref_texts)?;

            for (claim_vector, scores) in claim_vectors.iter().zip(support.iter_mut()) {
                let best = ref_vectors
                    .iter()
                    .map(|ref_vector| provider.similarity(claim_vector, ref_vector))
                    .fold(f32::NEG_INFINITY, f32::max);
                scores.push(best);
            }
        }

        debug!(
            claims = claims.len(),
            references = references.len(),
            contributing = support.first().map(Vec::len).unwrap_or(0),
            "Semantic support scores computed"
        );

        Ok(claims
            .iter()
            .zip(support)
            .map(|(claim, scores)| ClaimScores::new(claim.as_str(), ScoringMethod::Semantic, scores))
            .collect())
    }
}

fn lexical_scores(claims: &[String], references: &[&str]) -> Vec<ClaimScores> {
    let reference_words: Vec<_> = references.iter().map(|text| content_words(text)).collect();

    claims
        .iter()
        .map(|claim| {
            let claim_words = content_words(claim);
            let scores = reference_words
                .iter()
                .map(|words| overlap_ratio(&claim_words, words))
                .collect();
            ClaimScores::new(claim.as_str(), ScoringMethod::Lexical, scores)
        })
        .collect()
}

fn embed_checked(
    provider: &dyn EmbeddingProvider,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let vectors = provider.embed(texts)?;
    if vectors.len() != texts.len() {
        return Err(EmbeddingError::CountMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }
    Ok(vectors)
}
