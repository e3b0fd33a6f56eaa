//! Run records, loading and grouping.
//!
//! Records are validated once, here, into typed [`Run`]s. Everything downstream
//! works on [`RunGroup`]s: all runs sharing a `(model, scenario)` key, in the order
//! they were discovered.

pub mod error;
pub mod loader;
pub mod record;


pub use error::RunError;
pub use loader::{LoadedRuns, RejectedRecord, RunFilter, RunLoader};
pub use record::{RawRunRecord, Run};

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// `(model, scenario)` grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupKey {
    pub model: String,
    pub scenario: String,
}

impl GroupKey {
    pub fn new(model: impl Into<String>, scenario: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            scenario: scenario.into(),
        }
    }

    pub fn of(run: &Run) -> Self {
        Self::new(run.model.as_str(), run.scenario.as_str())
    }

    /// Report label, `"{model}_{scenario}"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.model, self.scenario)
    }
}

/// All runs for one `(model, scenario)`, in discovery order.
#[derive(Debug, Clone)]
pub struct RunGroup {
    key: GroupKey,
    runs: Vec<Run>,
}

impl RunGroup {
    pub fn new(key: GroupKey, runs: Vec<Run>) -> Self {
        Self { key, runs }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn label(&self) -> String {
        self.key.label()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Groups runs by `(model, scenario)`.
///
/// Groups come back sorted by label; runs inside a group keep their input order.
pub fn group_runs(runs: impl IntoIterator<Item = Run>) -> Vec<RunGroup> {
    let mut groups: BTreeMap<String, RunGroup> = BTreeMap::new();

    for run in runs {
        let key = GroupKey::of(&run);
        groups
            .entry(key.label())
            .or_insert_with(|| RunGroup::new(key, Vec::new()))
            .runs
            .push(run);
    }

    groups.into_values().collect()
}
