use super::*;
use std::cell::Cell;

use crate::embedding::{EmbeddingError, EmbeddingProvider, SentenceConfig, SentenceEmbedder};
use crate::runs::Run;

/// Returns fixed vectors by text; unknown text maps to the last axis.
struct TableProvider {
    table: Vec<(&'static str, Vec<f32>)>,
    calls: Cell<usize>,
}

impl TableProvider {
    fn new(table: Vec<(&'static str, Vec<f32>)>) -> Self {
        Self {
            table,
            calls: Cell::new(0),
        }
    }
}

impl EmbeddingProvider for TableProvider {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.set(self.calls.get() + 1);
        Ok(texts
            .iter()
            .map(|text| {
                self.table
                    .iter()
                    .find(|(key, _)| key == text)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_else(|| vec![0.0, 0.0, 1.0])
            })
            .collect())
    }

    fn embedding_dim(&self) -> usize {
        3
    }
}

struct FailingProvider;

impl EmbeddingProvider for FailingProvider {
    fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::InferenceFailed {
            reason: "device lost".to_string(),
        })
    }

    fn embedding_dim(&self) -> usize {
        3
    }
}

fn claims(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

mod types_tests {
    use super::*;

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::Factual.as_str(), "LIKELY_FACTUAL");
        assert_eq!(Verdict::Hallucination.to_string(), "LIKELY_HALLUCINATION");
        assert_eq!(
            serde_json::to_string(&Verdict::Factual).unwrap(),
            "\"LIKELY_FACTUAL\""
        );
    }

    #[test]
    fn test_method_labels() {
        assert_eq!(ScoringMethod::Semantic.to_string(), "semantic");
        assert_eq!(
            serde_json::to_string(&ScoringMethod::Lexical).unwrap(),
            "\"lexical\""
        );
    }

    #[test]
    fn test_avg_support_empty_is_zero() {
        let scores = ClaimScores::new("claim", ScoringMethod::Semantic, vec![]);
        assert_eq!(scores.avg_support(), 0.0);

        let verdict = scores.classify(0.0);
        assert_eq!(verdict.verdict, Verdict::Hallucination);
        assert_eq!(verdict.support_rate, 0.0);
        assert_eq!(verdict.n_references, 0);
    }

    #[test]
    fn test_semantic_gate_is_avg_support() {
        // Two of three references clear the threshold but the mean does not.
        let scores = ClaimScores::new("claim", ScoringMethod::Semantic, vec![0.7, 0.7, 0.1]);
        let verdict = scores.classify(0.65);

        assert_eq!(verdict.n_supporting, 2);
        assert!((verdict.support_rate - 2.0 / 3.0).abs() < 1e-6);
        assert!((verdict.avg_support - 0.5).abs() < 1e-6);
        assert_eq!(verdict.verdict, Verdict::Hallucination);
    }

    #[test]
    fn test_threshold_is_strict() {
        let scores = ClaimScores::new("claim", ScoringMethod::Semantic, vec![0.65]);
        assert_eq!(scores.classify(0.65).verdict, Verdict::Hallucination);
        assert_eq!(scores.classify(0.64).verdict, Verdict::Factual);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let all: Vec<ClaimScores> = [0.5, 0.7, 0.9]
            .iter()
            .map(|&s| ClaimScores::new("claim", ScoringMethod::Semantic, vec![s]))
            .collect();

        let counts: Vec<usize> = [0.4, 0.6, 0.8]
            .iter()
            .map(|&t| all.iter().filter(|s| s.classify(t).is_factual()).count())
            .collect();

        assert_eq!(counts, vec![3, 2, 1]);
    }

    #[test]
    fn test_lexical_majority_rule() {
        let scores = ClaimScores::new("claim", ScoringMethod::Lexical, vec![0.67, 0.31, 0.2]);
        let verdict = scores.classify(0.99);

        assert_eq!(verdict.n_supporting, 2);
        assert_eq!(verdict.n_references, 3);
        assert_eq!(verdict.verdict, Verdict::Factual);

        let split = ClaimScores::new("claim", ScoringMethod::Lexical, vec![0.67, 0.2]);
        assert_eq!(split.classify(0.0).verdict, Verdict::Hallucination);
    }
}

mod lexical_tests {
    use super::*;
    use crate::scoring::lexical::{content_words, overlap_ratio};

    #[test]
    fn test_content_words_filters_short_words() {
        let words = content_words("The PRICE and demand fell, so we sold 42 units.");
        let mut sorted: Vec<_> = words.into_iter().collect();
        sorted.sort();

        assert_eq!(sorted, vec!["demand", "fell", "price", "sold", "units"]);
    }

    #[test]
    fn test_overlap_scenario_c() {
        let claim = content_words("the price and demand fell");
        let reference = content_words("price demand rose");

        let overlap = overlap_ratio(&claim, &reference);
        assert!((overlap - 2.0 / 3.0).abs() < 1e-6);
        assert!(overlap > crate::constants::LEXICAL_OVERLAP_THRESHOLD);
    }

    #[test]
    fn test_overlap_claim_without_words() {
        let claim = content_words("It is so.");
        let reference = content_words("It is so, said the economist.");
        assert_eq!(overlap_ratio(&claim, &reference), 0.0);
    }
}

mod strategy_tests {
    use super::*;

    #[test]
    fn test_select_with_provider() {
        let provider = SentenceEmbedder::stub().unwrap();
        let strategy = ScoringStrategy::select(Some(&provider));

        assert!(strategy.is_semantic());
        assert_eq!(strategy.method(), ScoringMethod::Semantic);
        assert!(format!("{:?}", strategy).contains("Semantic"));
    }

    #[test]
    fn test_select_without_provider() {
        let strategy = ScoringStrategy::select(None);

        assert!(!strategy.is_semantic());
        assert_eq!(strategy.method(), ScoringMethod::Lexical);
    }
}

mod scorer_tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_threshold() {
        assert!(matches!(
            ConsistencyScorer::new(ScoringStrategy::Lexical, 1.5),
            Err(ScoringError::InvalidThreshold { .. })
        ));
        assert!(ConsistencyScorer::new(ScoringStrategy::Lexical, f32::NAN).is_err());
        assert!(ConsistencyScorer::new(ScoringStrategy::Lexical, 0.0).is_ok());
    }

    #[test]
    fn test_scenario_a_paraphrase_is_factual() {
        let provider = SentenceEmbedder::stub().unwrap();
        let scorer = ConsistencyScorer::new(ScoringStrategy::select(Some(&provider)), 0.65).unwrap();

        let verdicts = scorer
            .score(
                &claims(&["Demand fell because prices rose."]),
                &["Prices rose, so demand fell. Competitors kept their catalogues unchanged."],
            )
            .unwrap();

        assert_eq!(verdicts.len(), 1);
        assert!(verdicts[0].avg_support > 0.65, "{:?}", verdicts[0]);
        assert_eq!(verdicts[0].verdict, Verdict::Factual);
        assert_eq!(verdicts[0].method, ScoringMethod::Semantic);
    }

    #[test]
    fn test_scenario_b_fabrication_is_hallucination() {
        let provider = SentenceEmbedder::load(SentenceConfig::stub().with_embedding_dim(4096))
            .unwrap();
        let scorer = ConsistencyScorer::new(ScoringStrategy::select(Some(&provider)), 0.65).unwrap();

        let verdicts = scorer
            .score(
                &claims(&["Exactly 73.4 percent of buyers cited nostalgia."]),
                &[
                    "Prices rose, so demand fell sharply.",
                    "Demand fell because prices rose quickly.",
                ],
            )
            .unwrap();

        assert!(verdicts[0].avg_support < 0.3, "{:?}", verdicts[0]);
        assert_eq!(verdicts[0].n_supporting, 0);
        assert_eq!(verdicts[0].verdict, Verdict::Hallucination);
    }

    #[test]
    fn test_scenario_c_lexical_support() {
        let scorer = ConsistencyScorer::new(ScoringStrategy::Lexical, 0.65).unwrap();

        let verdicts = scorer
            .score(&claims(&["the price and demand fell"]), &["price demand rose"])
            .unwrap();

        assert_eq!(verdicts[0].method, ScoringMethod::Lexical);
        assert_eq!(verdicts[0].n_supporting, 1);
        assert_eq!(verdicts[0].n_references, 1);
        assert_eq!(verdicts[0].verdict, Verdict::Factual);
    }

    #[test]
    fn test_scenario_d_reclassification_keeps_scores() {
        let provider = SentenceEmbedder::stub().unwrap();
        let scorer = ConsistencyScorer::new(ScoringStrategy::select(Some(&provider)), 0.65).unwrap();

        let raw = scorer
            .score_claims(
                &claims(&[
                    "Demand fell because prices rose.",
                    "The relaunch campaign doubled quarterly revenue.",
                ]),
                &[
                    "Prices rose, so demand fell. Revenue doubled after the relaunch campaign.",
                    "Demand fell since prices rose. The campaign had no measurable effect.",
                ],
            )
            .unwrap();

        let baseline: Vec<f32> = raw.iter().map(|s| s.avg_support()).collect();
        for threshold in [0.5, 0.65, 0.8] {
            let reclassified: Vec<f32> = raw
                .iter()
                .map(|s| s.classify(threshold).avg_support)
                .collect();
            assert_eq!(reclassified, baseline);
        }
    }

    #[test]
    fn test_empty_reference_excluded_from_denominator() {
        let provider = TableProvider::new(vec![
            ("Demand fell because prices rose.", vec![1.0, 0.0, 0.0]),
            ("Prices rose, so demand fell.", vec![1.0, 0.0, 0.0]),
        ]);
        let scorer = ConsistencyScorer::new(ScoringStrategy::select(Some(&provider)), 0.65).unwrap();

        let verdicts = scorer
            .score(
                &claims(&["Demand fell because prices rose."]),
                &["", "## Only a heading", "Prices rose, so demand fell."],
            )
            .unwrap();

        assert_eq!(verdicts[0].n_references, 1);
        assert!((verdicts[0].avg_support - 1.0).abs() < 1e-6);
        assert_eq!(verdicts[0].support_rate, 1.0);
    }

    #[test]
    fn test_support_score_is_max_over_reference_claims() {
        let provider = TableProvider::new(vec![
            ("Demand fell because prices rose.", vec![1.0, 0.0, 0.0]),
            ("Completely unrelated filler sentence.", vec![0.0, 1.0, 0.0]),
            ("Prices rose, so demand fell.", vec![0.8, 0.6, 0.0]),
        ]);
        let scorer = ConsistencyScorer::new(ScoringStrategy::select(Some(&provider)), 0.65).unwrap();

        let raw = scorer
            .score_claims(
                &claims(&["Demand fell because prices rose."]),
                &["Completely unrelated filler sentence. Prices rose, so demand fell."],
            )
            .unwrap();

        assert_eq!(raw[0].support_scores.len(), 1);
        assert!((raw[0].support_scores[0] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_targets_embedded_once_references_once_each() {
        let provider = TableProvider::new(vec![]);
        let scorer = ConsistencyScorer::new(ScoringStrategy::select(Some(&provider)), 0.65).unwrap();

        scorer
            .score(
                &claims(&[
                    "First claim sentence for the target.",
                    "Second claim sentence for the target.",
                ]),
                &[
                    "Reference one has a sentence. And another one here.",
                    "too short",
                    "Reference three has a sentence too.",
                ],
            )
            .unwrap();

        // 1 target batch + 2 references with claims.
        assert_eq!(provider.calls.get(), 3);
    }

    #[test]
    fn test_no_references_is_hallucination() {
        let provider = SentenceEmbedder::stub().unwrap();
        let semantic = ConsistencyScorer::new(ScoringStrategy::select(Some(&provider)), 0.65).unwrap();
        let lexical = ConsistencyScorer::new(ScoringStrategy::Lexical, 0.65).unwrap();

        for scorer in [semantic, lexical] {
            let verdicts = scorer
                .score(&claims(&["Demand fell because prices rose."]), &[])
                .unwrap();
            assert_eq!(verdicts[0].avg_support, 0.0);
            assert_eq!(verdicts[0].support_rate, 0.0);
            assert_eq!(verdicts[0].verdict, Verdict::Hallucination);
        }
    }

    #[test]
    fn test_lexical_counts_every_reference() {
        let scorer = ConsistencyScorer::new(ScoringStrategy::Lexical, 0.65).unwrap();

        let verdicts = scorer
            .score(
                &claims(&["Demand fell because prices rose."]),
                &["", "Demand fell as prices rose.", "Nothing relevant."],
            )
            .unwrap();

        assert_eq!(verdicts[0].n_references, 3);
        assert_eq!(verdicts[0].n_supporting, 1);
        assert_eq!(verdicts[0].verdict, Verdict::Hallucination);
    }

    #[test]
    fn test_support_rate_bounds() {
        let provider = SentenceEmbedder::stub().unwrap();
        let scorer = ConsistencyScorer::new(ScoringStrategy::select(Some(&provider)), 0.3).unwrap();

        let verdicts = scorer
            .score(
                &claims(&[
                    "Demand fell because prices rose.",
                    "The relaunch campaign doubled quarterly revenue.",
                    "Exactly 73.4 percent of buyers cited nostalgia.",
                ]),
                &[
                    "Prices rose, so demand fell. Revenue doubled after the relaunch campaign.",
                    "",
                    "Buyers cited nostalgia in a survey. Prices rose sharply this year.",
                ],
            )
            .unwrap();

        for verdict in &verdicts {
            assert!((0.0..=1.0).contains(&verdict.support_rate));
            assert!(verdict.n_supporting <= verdict.n_references);
        }
    }

    #[test]
    fn test_empty_claims_skip_embedding() {
        let provider = TableProvider::new(vec![]);
        let scorer = ConsistencyScorer::new(ScoringStrategy::select(Some(&provider)), 0.65).unwrap();

        let verdicts = scorer.score(&[], &["Some reference sentence here."]).unwrap();
        assert!(verdicts.is_empty());
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let provider = FailingProvider;
        let scorer = ConsistencyScorer::new(ScoringStrategy::select(Some(&provider)), 0.65).unwrap();

        let result = scorer.score(
            &claims(&["Demand fell because prices rose."]),
            &["Prices rose, so demand fell."],
        );
        assert!(matches!(result, Err(ScoringError::Embedding(_))));
    }

    #[test]
    fn test_score_target_extracts_claims() {
        let scorer = ConsistencyScorer::new(ScoringStrategy::Lexical, 0.65).unwrap();
        let target = Run::new(
            "PPH-001-A-STOCH-01",
            "claude",
            "econ",
            "# Findings\nDemand fell because prices rose. Short.",
        );
        let reference = Run::new(
            "PPH-001-A-STOCH-02",
            "claude",
            "econ",
            "Prices rose and demand fell.",
        );

        let verdicts = scorer.score_target(&target, &[&reference]).unwrap();
        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].claim, "Demand fell because prices rose.");
        assert_eq!(verdicts[0].verdict, Verdict::Factual);
    }
}
