//! `selfcheck` command line entrypoint.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tracing::{info, warn};

use selfcheck::config::parse_thresholds;
use selfcheck::embedding::{EmbeddingProvider, available_provider};
use selfcheck::report::{
    AnalysisKind, ReportMetadata, ResultAggregator, rotation_table, single_pass_table, sweep_table,
    write_report,
};
use selfcheck::{
    AnchorRotationAnalyzer, Config, ConsistencyScorer, EmbedderMode, RunGroup, RunLoader,
    ScoringStrategy, SinglePassAnalyzer, ThresholdSweepAnalyzer, group_runs,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "selfcheck", version, about = "Cross-sample consistency audit")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,

    /// Directory holding run JSON files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Report path (defaults to a per-analysis file inside the data dir)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Similarity threshold for the semantic verdict
    #[arg(long, global = true)]
    threshold: Option<f32>,

    /// Embedding provider: auto, stub or lexical
    #[arg(long, global = true)]
    embedder: Option<EmbedderMode>,
}

#[derive(Subcommand)]
enum Cmd {
    /// First run as target, the next N runs as references
    Single {
        #[arg(long)]
        n_reference: Option<usize>,
    },
    /// Every run takes a turn as the target
    Rotation,
    /// Score once, reclassify at several thresholds
    Sweep {
        #[arg(long)]
        n_reference: Option<usize>,
        /// Comma separated, ascending (e.g. 0.5,0.65,0.8)
        #[arg(long)]
        thresholds: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    apply_overrides(&mut config, &cli)?;
    config.validate()?;

    info!(
        data_dir = %config.data_dir.display(),
        threshold = config.threshold,
        embedder = %config.embedder,
        "SelfCheck audit starting"
    );

    let loaded = RunLoader::from_config(&config)
        .load()
        .context("failed to load runs")?;
    if !loaded.rejected.is_empty() {
        warn!(rejected = loaded.rejected.len(), "Some run records were rejected");
    }
    if loaded.runs.is_empty() {
        anyhow::bail!(
            "no stochastic runs found in {} (expected files like {}ECON-SEVERE-CLAUDE-T07-{}-01.json)",
            config.data_dir.display(),
            config.run_prefix,
            config.stoch_marker
        );
    }

    let groups = group_runs(loaded.runs);
    info!(groups = groups.len(), "Runs grouped by model and scenario");

    let provider = available_provider(&config);
    let strategy =
        ScoringStrategy::select(provider.as_ref().map(|p| p as &dyn EmbeddingProvider));
    let scorer = ConsistencyScorer::new(strategy, config.threshold)?;

    match cli.cmd {
        Cmd::Single { .. } => run_single(&config, scorer, &groups),
        Cmd::Rotation => run_rotation(&config, scorer, &groups),
        Cmd::Sweep { .. } => run_sweep(&config, scorer, &groups),
    }
}

fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(output) = &cli.output {
        config.output_path = Some(output.clone());
    }
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    if let Some(embedder) = cli.embedder {
        config.embedder = embedder;
    }

    match &cli.cmd {
        Cmd::Single { n_reference } => {
            if let Some(n) = n_reference {
                config.n_reference = *n;
            }
        }
        Cmd::Rotation => {}
        Cmd::Sweep {
            n_reference,
            thresholds,
        } => {
            if let Some(n) = n_reference {
                config.sweep_n_reference = *n;
            }
            if let Some(list) = thresholds {
                config.sweep_thresholds = parse_thresholds(list)?;
            }
        }
    }

    Ok(())
}

fn run_single(
    config: &Config,
    scorer: ConsistencyScorer<'_>,
    groups: &[RunGroup],
) -> anyhow::Result<()> {
    let analyzer = SinglePassAnalyzer::new(scorer, config.n_reference)?;
    let outcomes = analyzer.analyze(groups);

    let aggregator = ResultAggregator::new();
    let report = aggregator.single_pass(&outcomes.completed);
    let overall = aggregator.single_pass_overall(&outcomes.completed);

    let path = config.output_path_or(AnalysisKind::SinglePass.default_file_name());
    let metadata = ReportMetadata::new(AnalysisKind::SinglePass, scorer.method())
        .with_threshold(scorer.threshold())
        .with_n_reference(config.n_reference)
        .with_groups(groups.len(), &outcomes.skipped);
    write_report(&path, &report, &metadata)?;

    println!("{}", single_pass_table(&report, &overall));
    println!("Results saved to: {}", path.display());
    Ok(())
}

fn run_rotation(
    config: &Config,
    scorer: ConsistencyScorer<'_>,
    groups: &[RunGroup],
) -> anyhow::Result<()> {
    let analyzer = AnchorRotationAnalyzer::new(scorer);
    let outcomes = analyzer.analyze(groups);

    let aggregator = ResultAggregator::new();
    let report = aggregator.rotation(&outcomes.completed);
    let overall = aggregator.rotation_overall(&outcomes.completed);

    let path = config.output_path_or(AnalysisKind::AnchorRotation.default_file_name());
    let metadata = ReportMetadata::new(AnalysisKind::AnchorRotation, scorer.method())
        .with_threshold(scorer.threshold())
        .with_groups(groups.len(), &outcomes.skipped);
    write_report(&path, &report, &metadata)?;

    println!("{}", rotation_table(&report, overall));
    println!("Saved: {}", path.display());
    Ok(())
}

fn run_sweep(
    config: &Config,
    scorer: ConsistencyScorer<'_>,
    groups: &[RunGroup],
) -> anyhow::Result<()> {
    let analyzer = ThresholdSweepAnalyzer::new(
        scorer,
        config.sweep_thresholds.clone(),
        config.sweep_n_reference,
    )?;
    let outcomes = analyzer.analyze(groups);
    let result = analyzer.collect_result(outcomes.completed);

    let report = ResultAggregator::new().sweep(&result);

    let path = config.output_path_or(AnalysisKind::ThresholdSweep.default_file_name());
    let metadata = ReportMetadata::new(AnalysisKind::ThresholdSweep, scorer.method())
        .with_thresholds(analyzer.thresholds())
        .with_n_reference(analyzer.n_reference())
        .with_groups(groups.len(), &outcomes.skipped);
    write_report(&path, &report, &metadata)?;

    println!("{}", sweep_table(&report));
    println!("Saved: {}", path.display());
    Ok(())
}
