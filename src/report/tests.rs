use super::*;
use serde_json::json;

use crate::analysis::{
    AnchorRotationResult, GroupResult, SkippedGroup, SpreadStats, SweepGroup, SweepPoint,
    ThresholdSweepResult,
};
use crate::runs::GroupKey;
use crate::scoring::{ClaimScores, ClaimVerdict, ScoringMethod, Verdict};

fn semantic_verdict(claim: &str, scores: Vec<f32>) -> ClaimVerdict {
    ClaimScores::new(claim, ScoringMethod::Semantic, scores).classify(0.65)
}

fn group_result(model: &str, verdicts: Vec<ClaimVerdict>) -> GroupResult {
    GroupResult {
        key: GroupKey::new(model, "econ"),
        method: ScoringMethod::Semantic,
        threshold: 0.65,
        target_run_id: format!("PPH-001-{}-STOCH-01", model),
        n_references: 5,
        verdicts,
    }
}

mod format_tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.66666, 3), 0.667);
        assert_eq!(round_to(1.0, 3), 1.0);
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(1.0 / 8.0, 2), 0.12);
        assert_eq!(round_to(3.0 / 8.0, 2), 0.38);
        assert_eq!(round_to(1.0 / 16.0, 3), 0.062);
        assert_eq!(round_to(13.0 / 16.0, 3), 0.812);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn test_pass_counts_round_ties_to_even() {
        assert_eq!(PassCounts::new(1, 16).pass_rate, 0.062);
        assert_eq!(PassCounts::new(13, 16).pass_rate, 0.812);
        assert_eq!(PassCounts::new(3, 16).pass_rate, 0.188);
    }

    #[test]
    fn test_display_claim_truncates() {
        let long = "x".repeat(130);
        let shown = display_claim(&long);

        assert_eq!(shown.chars().count(), 123);
        assert!(shown.ends_with("..."));
        assert_eq!(display_claim(&"y".repeat(120)), "y".repeat(120));
    }

    #[test]
    fn test_display_claim_counts_chars() {
        let accented = "é".repeat(121);
        assert_eq!(display_claim(&accented), format!("{}...", "é".repeat(120)));
    }

    #[test]
    fn test_threshold_key() {
        assert_eq!(threshold_key(0.65), "0.65");
        assert_eq!(threshold_key(0.5), "0.50");
    }

    #[test]
    fn test_pass_counts_empty() {
        let counts = PassCounts::new(0, 0);
        assert_eq!(counts.pass_rate, 0.0);
        assert_eq!(PassCounts::new(2, 3).pass_rate, 0.667);
    }
}

mod detail_tests {
    use super::*;

    #[test]
    fn test_semantic_detail_fields() {
        let verdict = semantic_verdict("Demand fell because prices rose.", vec![0.9, 0.7, 0.2]);
        let value = serde_json::to_value(ClaimDetail::from(&verdict)).unwrap();

        assert_eq!(
            value,
            json!({
                "claim": "Demand fell because prices rose.",
                "avg_bertscore": 0.6,
                "n_samples_supporting": 2,
                "n_samples_total": 3,
                "support_rate": 0.67,
                "selfcheckgpt_verdict": "LIKELY_HALLUCINATION",
                "pph_ground_truth": "UNKNOWN"
            })
        );
    }

    #[test]
    fn test_lexical_detail_fields() {
        let verdict =
            ClaimScores::new("Demand fell because prices rose.", ScoringMethod::Lexical, vec![
                0.8, 0.6, 0.1,
            ])
            .classify(0.65);
        let value = serde_json::to_value(ClaimDetail::from(&verdict)).unwrap();

        assert_eq!(value["keyword_overlap_support"], 2);
        assert_eq!(value["n_samples_total"], 3);
        assert_eq!(value["selfcheckgpt_verdict"], "LIKELY_FACTUAL");
        assert!(value.get("avg_bertscore").is_none());
        assert!(value.get("n_samples_supporting").is_none());
    }
}

mod aggregator_tests {
    use super::*;

    #[test]
    fn test_single_pass_report() {
        let results = vec![
            group_result(
                "claude",
                vec![
                    semantic_verdict("Claim one is long enough.", vec![0.9, 0.8]),
                    semantic_verdict("Claim two is long enough.", vec![0.1, 0.2]),
                    semantic_verdict("Claim three is long enough.", vec![0.7, 0.7]),
                ],
            ),
            group_result("gpt", vec![]),
        ];

        let aggregator = ResultAggregator::new();
        let report = aggregator.single_pass(&results);

        let claude = &report["claude_econ"];
        assert_eq!(claude.model, "claude");
        assert_eq!(claude.scenario, "econ");
        assert_eq!(claude.n_claims, 3);
        assert_eq!(claude.n_passed_as_factual, 2);
        assert_eq!(claude.n_flagged_as_hallucination, 1);
        assert_eq!(claude.pass_rate, 0.667);
        assert_eq!(claude.claim_details[1].selfcheckgpt_verdict, Verdict::Hallucination);

        assert_eq!(report["gpt_econ"].pass_rate, 0.0);

        let overall = aggregator.single_pass_overall(&results);
        assert_eq!(overall.n_factual, 2);
        assert_eq!(overall.n_claims, 3);

        let table = single_pass_table(&report, &overall);
        assert!(table.contains("claude_econ"));
        assert!(table.contains("OVERALL"));
        assert!(table.contains("67%"));
    }

    #[test]
    fn test_rotation_report() {
        let rates = vec![0.5, 1.0, 0.0];
        let result = AnchorRotationResult {
            key: GroupKey::new("claude", "econ"),
            method: ScoringMethod::Semantic,
            threshold: 0.65,
            stats: SpreadStats::from_values(&rates).unwrap(),
            pass_rates: rates,
        };

        let aggregator = ResultAggregator::new();
        let report = aggregator.rotation(std::slice::from_ref(&result));
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(
            value["claude_econ"],
            json!({
                "model": "claude",
                "scenario": "econ",
                "n_anchors": 3,
                "threshold": 0.65,
                "per_anchor_pass_rates": [0.5, 1.0, 0.0],
                "mean": 0.5,
                "std": 0.408,
                "min": 0.0,
                "max": 1.0,
                "range": 1.0
            })
        );

        let overall = aggregator.rotation_overall(&[result]);
        assert_eq!(overall, Some((0.5, 0.0)));

        let table = rotation_table(&report, overall);
        assert!(table.contains("claude_econ"));
        assert!(table.contains("Overall mean of means: 50%"));
    }

    #[test]
    fn test_sweep_report() {
        let result = ThresholdSweepResult {
            thresholds: vec![0.5, 0.65],
            groups: vec![
                SweepGroup {
                    key: GroupKey::new("claude", "econ"),
                    method: ScoringMethod::Semantic,
                    claim_scores: vec![],
                    points: vec![
                        SweepPoint {
                            n_factual: 3,
                            n_claims: 4,
                        },
                        SweepPoint {
                            n_factual: 1,
                            n_claims: 4,
                        },
                    ],
                },
                SweepGroup {
                    key: GroupKey::new("gpt", "econ"),
                    method: ScoringMethod::Semantic,
                    claim_scores: vec![],
                    points: vec![
                        SweepPoint {
                            n_factual: 2,
                            n_claims: 2,
                        },
                        SweepPoint {
                            n_factual: 2,
                            n_claims: 2,
                        },
                    ],
                },
            ],
        };

        let report = ResultAggregator::new().sweep(&result);
        let keys: Vec<&String> = report.keys().collect();
        assert_eq!(keys, vec!["0.50", "0.65"]);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value["0.65"],
            json!({
                "threshold": 0.65,
                "groups": {
                    "claude_econ": { "n_factual": 1, "n_claims": 4, "pass_rate": 0.25 },
                    "gpt_econ": { "n_factual": 2, "n_claims": 2, "pass_rate": 1.0 }
                },
                "overall": { "n_factual": 3, "n_claims": 6, "pass_rate": 0.5 }
            })
        );
        assert_eq!(value["0.50"]["overall"]["n_factual"], 5);

        let table = sweep_table(&report);
        assert!(table.contains("Threshold"));
        assert!(table.contains("3/6 (50%)"));
    }
}

mod writer_tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_metadata_path() {
        assert_eq!(
            metadata_path(Path::new("/data/selfcheckgpt_results.json")),
            Path::new("/data/selfcheckgpt_results.meta.json")
        );
    }

    #[test]
    fn test_default_file_names() {
        assert_eq!(
            AnalysisKind::SinglePass.default_file_name(),
            "selfcheckgpt_results.json"
        );
        assert_eq!(
            AnalysisKind::AnchorRotation.default_file_name(),
            "selfcheckgpt_anchor_rotation.json"
        );
        assert_eq!(
            AnalysisKind::ThresholdSweep.default_file_name(),
            "selfcheckgpt_threshold_sweep.json"
        );
    }

    #[test]
    fn test_write_report_with_sidecar() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("selfcheckgpt_results.json");
        let skipped = vec![SkippedGroup {
            key: GroupKey::new("llama", "econ"),
            reason: "group 'llama_econ' has 1 runs, needs at least 2".to_string(),
        }];
        let metadata = ReportMetadata::new(AnalysisKind::SinglePass, ScoringMethod::Lexical)
            .with_threshold(0.65)
            .with_n_reference(5)
            .with_groups(2, &skipped);

        let report = ResultAggregator::new().single_pass(&[group_result("claude", vec![])]);
        let meta_path = write_report(&path, &report, &metadata).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["claude_econ"]["n_claims"], 0);

        let meta: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&meta_path).unwrap()).unwrap();
        assert_eq!(meta["analysis"], "single_pass");
        assert_eq!(meta["method"], "lexical");
        assert_eq!(meta["threshold"], 0.65);
        assert_eq!(meta["n_reference"], 5);
        assert_eq!(meta["skipped_groups"][0]["group"], "llama_econ");
        assert!(meta.get("thresholds").is_none());
        assert!(meta["generated_at"].is_string());
    }

    #[test]
    fn test_write_report_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let metadata = ReportMetadata::new(AnalysisKind::SinglePass, ScoringMethod::Semantic);

        let result = write_report(&path, &SinglePassReport::new(), &metadata);
        assert!(matches!(result, Err(ReportError::Write { .. })));
    }
}
