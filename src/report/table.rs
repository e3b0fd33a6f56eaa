//! Plain-text summary tables.

use tabled::{Table, Tabled};

use super::types::{AnchorRotationReport, PassCounts, SinglePassReport, ThresholdSweepReport};

#[derive(Tabled)]
struct SinglePassRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Claims")]
    claims: usize,
    #[tabled(rename = "Factual")]
    factual: usize,
    #[tabled(rename = "Hallucination")]
    hallucination: usize,
    #[tabled(rename = "Pass rate")]
    pass_rate: String,
}

#[derive(Tabled)]
struct RotationRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Anchors")]
    anchors: usize,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Std")]
    std: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Range")]
    range: String,
}

fn percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

fn counts_cell(counts: &PassCounts) -> String {
    format!(
        "{}/{} ({})",
        counts.n_factual,
        counts.n_claims,
        percent(counts.pass_rate)
    )
}

/// One row per group plus an overall row.
pub fn single_pass_table(report: &SinglePassReport, overall: &PassCounts) -> String {
    let mut rows: Vec<SinglePassRow> = report
        .iter()
        .map(|(group, result)| SinglePassRow {
            group: group.clone(),
            claims: result.n_claims,
            factual: result.n_passed_as_factual,
            hallucination: result.n_flagged_as_hallucination,
            pass_rate: percent(result.pass_rate),
        })
        .collect();

    rows.push(SinglePassRow {
        group: "OVERALL".to_string(),
        claims: overall.n_claims,
        factual: overall.n_factual,
        hallucination: overall.n_claims - overall.n_factual,
        pass_rate: percent(overall.pass_rate),
    });

    Table::new(rows).to_string()
}

/// One row per group; `overall` is the mean and std of the group means.
pub fn rotation_table(report: &AnchorRotationReport, overall: Option<(f64, f64)>) -> String {
    let mut table = Table::new(report.iter().map(|(group, result)| RotationRow {
        group: group.clone(),
        anchors: result.n_anchors,
        mean: percent(result.mean),
        std: format!("{:.3}", result.std),
        min: percent(result.min),
        max: percent(result.max),
        range: format!("{:.3}", result.range),
    }))
    .to_string();

    if let Some((mean, std)) = overall {
        table.push_str(&format!(
            "\nOverall mean of means: {}\nOverall std of means:  {:.3}",
            percent(mean),
            std
        ));
    }

    table
}

/// Threshold × group grid with an overall column.
pub fn sweep_table(report: &ThresholdSweepReport) -> String {
    let groups: Vec<&String> = report
        .values()
        .next()
        .map(|first| first.groups.keys().collect())
        .unwrap_or_default();

    let mut builder = tabled::builder::Builder::default();

    let mut header = vec!["Threshold".to_string()];
    header.extend(groups.iter().map(|g| g.to_string()));
    header.push("OVERALL".to_string());
    builder.push_record(header);

    for (key, at_threshold) in report {
        let mut row = vec![key.clone()];
        row.extend(groups.iter().map(|group| {
            at_threshold
                .groups
                .get(*group)
                .map(counts_cell)
                .unwrap_or_default()
        }));
        row.push(counts_cell(&at_threshold.overall));
        builder.push_record(row);
    }

    builder.build().to_string()
}
