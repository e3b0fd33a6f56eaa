use serde::{Deserialize, Serialize};

use super::error::RunError;

/// A generated response, validated at the load boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub run_id: String,
    pub model: String,
    pub scenario: String,
    pub response_text: String,
    pub prompt_text: String,
    pub run_number: Option<i64>,
}

impl Run {
    /// Builds a run directly (no prompt, no run number).
    pub fn new(
        run_id: impl Into<String>,
        model: impl Into<String>,
        scenario: impl Into<String>,
        response_text: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            model: model.into(),
            scenario: scenario.into(),
            response_text: response_text.into(),
            prompt_text: String::new(),
            run_number: None,
        }
    }

    pub fn with_prompt(mut self, prompt_text: impl Into<String>) -> Self {
        self.prompt_text = prompt_text.into();
        self
    }

    pub fn with_run_number(mut self, run_number: i64) -> Self {
        self.run_number = Some(run_number);
        self
    }

    /// Parses and validates a JSON run record.
    pub fn from_json(json: &str) -> Result<Self, RunError> {
        let raw: RawRunRecord = serde_json::from_str(json)?;
        Self::try_from(raw)
    }
}

/// Run record as stored on disk; every field is optional until validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRunRecord {
    pub run_id: Option<String>,
    pub model: Option<String>,
    pub scenario: Option<String>,
    pub full_response: Option<String>,
    pub prompt_text: Option<String>,
    pub run_number: Option<i64>,
}

impl TryFrom<RawRunRecord> for Run {
    type Error = RunError;

    fn try_from(raw: RawRunRecord) -> Result<Self, Self::Error> {
        let run_id = required_non_empty(raw.run_id, "run_id")?;
        let model = required_non_empty(raw.model, "model")?;
        let scenario = required_non_empty(raw.scenario, "scenario")?;
        // An empty response is a valid run with zero claims.
        let response_text = raw.full_response.ok_or(RunError::MissingField {
            field: "full_response",
        })?;
        let prompt_text = raw.prompt_text.ok_or(RunError::MissingField {
            field: "prompt_text",
        })?;

        Ok(Self {
            run_id,
            model,
            scenario,
            response_text,
            prompt_text,
            run_number: raw.run_number,
        })
    }
}

fn required_non_empty(value: Option<String>, field: &'static str) -> Result<String, RunError> {
    let value = value.ok_or(RunError::MissingField { field })?;
    if value.trim().is_empty() {
        return Err(RunError::EmptyField { field });
    }
    Ok(value)
}
