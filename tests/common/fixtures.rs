//! Run fixtures shared by the integration tests.

use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

use selfcheck::{Run, RunGroup, group_runs};

/// A response most samples agree with.
pub const CONSENSUS: &str = "## Quarterly Analysis\n\
Demand fell because prices rose. The relaunch campaign doubled quarterly revenue.";

/// Same content, reworded.
pub const PARAPHRASE: &str = "Prices rose, so demand fell. \
Quarterly revenue doubled after the relaunch campaign.";

/// Shares nothing with the others.
pub const UNRELATED: &str = "Warehouse staffing stayed flat all year. \
Shipping costs were negotiated down with every carrier.";

/// One claim the others back, one they never mention.
pub const HALF_SUPPORTED: &str = "Demand fell because prices rose. \
Warehouse staffing stayed flat all year.";

/// No qualifying claims at all.
pub const NO_CLAIMS: &str = "# Heading\n| a | b |\n- bullet point text here\nShort.";

/// Builder for run records on disk and in memory.
#[derive(Debug, Clone)]
pub struct RunBuilder {
    model: String,
    scenario: String,
    number: u32,
    response: String,
    marker: String,
}

impl RunBuilder {
    pub fn new(model: &str, scenario: &str, number: u32) -> Self {
        Self {
            model: model.to_string(),
            scenario: scenario.to_string(),
            number,
            response: CONSENSUS.to_string(),
            marker: "STOCH".to_string(),
        }
    }

    pub fn response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Marks the run as deterministic (filtered out by the loader).
    pub fn deterministic(mut self) -> Self {
        self.marker = "DET".to_string();
        self
    }

    pub fn run_id(&self) -> String {
        format!(
            "PPH-001-{}-{}-{}-{:02}",
            self.scenario.to_uppercase(),
            self.model.to_uppercase(),
            self.marker,
            self.number
        )
    }

    pub fn build(&self) -> Run {
        Run::new(
            self.run_id(),
            self.model.as_str(),
            self.scenario.as_str(),
            self.response.as_str(),
        )
        .with_prompt("Explain the quarterly sales data.")
        .with_run_number(i64::from(self.number))
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "run_id": self.run_id(),
            "model": self.model,
            "scenario": self.scenario,
            "prompt_text": "Explain the quarterly sales data.",
            "full_response": self.response,
            "run_number": self.number,
        })
    }

    /// Writes `<run_id>.json` into `dir`.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        self.write_as(dir, &format!("{}.json", self.run_id()))
    }

    pub fn write_as(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        std::fs::write(&path, self.to_json().to_string()).unwrap();
        path
    }
}

/// One group whose responses are `responses`, in order.
pub fn group_of(model: &str, scenario: &str, responses: &[&str]) -> RunGroup {
    let runs: Vec<Run> = responses
        .iter()
        .enumerate()
        .map(|(i, response)| {
            RunBuilder::new(model, scenario, i as u32 + 1)
                .response(response)
                .build()
        })
        .collect();

    group_runs(runs).remove(0)
}

/// A data directory with two stochastic groups and some noise:
///
/// - `claude/econ`: 4 runs of consensus and paraphrase
/// - `gpt/econ`: 3 runs, the first one unrelated to the rest
/// - `llama/econ`: a single run
/// - a deterministic record stored under a stochastic file name
/// - a deterministic file, a malformed file and an unrelated file name
pub fn populated_data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();

    for (number, response) in [(1, CONSENSUS), (2, PARAPHRASE), (3, CONSENSUS), (4, PARAPHRASE)] {
        RunBuilder::new("claude", "econ", number)
            .response(response)
            .write_to(dir.path());
    }
    for (number, response) in [(1, UNRELATED), (2, CONSENSUS), (3, PARAPHRASE)] {
        RunBuilder::new("gpt", "econ", number)
            .response(response)
            .write_to(dir.path());
    }
    RunBuilder::new("llama", "econ", 1).write_to(dir.path());
    RunBuilder::new("claude", "econ", 8)
        .deterministic()
        .write_as(dir.path(), "PPH-001-ECON-CLAUDE-STOCH-08.json");
    RunBuilder::new("claude", "econ", 9)
        .deterministic()
        .write_to(dir.path());

    std::fs::write(
        dir.path().join("PPH-001-ECON-BROKEN-STOCH-01.json"),
        r#"{"run_id": "PPH-001-ECON-BROKEN-STOCH-01", "model": "broken""#,
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

    dir
}
