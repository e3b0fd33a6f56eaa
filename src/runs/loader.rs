use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::error::RunError;
use super::record::Run;
use crate::config::Config;
use crate::constants::{DEFAULT_RUN_PREFIX, DEFAULT_STOCH_MARKER};

/// Selects the stochastic subset of run files and records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFilter {
    /// Required file name prefix.
    pub prefix: String,
    /// Marker that must appear in the file name and in the `run_id`.
    pub marker: String,
}

impl Default for RunFilter {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_RUN_PREFIX.to_string(),
            marker: DEFAULT_STOCH_MARKER.to_string(),
        }
    }
}

impl RunFilter {
    pub fn new(prefix: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            marker: marker.into(),
        }
    }

    /// Returns `true` for `<prefix>...<marker>....json` file names.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        file_name.ends_with(".json")
            && file_name.starts_with(&self.prefix)
            && file_name.contains(&self.marker)
    }

    /// Returns `true` if the run id carries the stochastic marker.
    pub fn matches_run_id(&self, run_id: &str) -> bool {
        run_id.contains(&self.marker)
    }
}

/// A file that was selected but rejected during validation.
#[derive(Debug)]
pub struct RejectedRecord {
    pub path: PathBuf,
    pub error: RunError,
}

/// Output of [`RunLoader::load`].
#[derive(Debug, Default)]
pub struct LoadedRuns {
    /// Valid runs in file-name order.
    pub runs: Vec<Run>,
    /// Records excluded by validation.
    pub rejected: Vec<RejectedRecord>,
    /// Valid records dropped because their `run_id` lacks the marker.
    pub filtered_out: usize,
}

/// Reads stochastic run records from a directory.
#[derive(Debug, Clone)]
pub struct RunLoader {
    dir: PathBuf,
    filter: RunFilter,
}

impl RunLoader {
    pub fn new(dir: impl Into<PathBuf>, filter: RunFilter) -> Self {
        Self {
            dir: dir.into(),
            filter,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.data_dir.clone(),
            RunFilter::new(config.run_prefix.clone(), config.stoch_marker.clone()),
        )
    }

    /// Loads every matching file. A bad record is rejected on its own; only an
    /// unreadable directory fails the whole load.
    pub fn load(&self) -> Result<LoadedRuns, RunError> {
        let mut loaded = LoadedRuns::default();

        for path in self.matching_files()? {
            match load_run_file(&path) {
                Ok(run) if self.filter.matches_run_id(&run.run_id) => {
                    debug!(run_id = %run.run_id, path = %path.display(), "Loaded run");
                    loaded.runs.push(run);
                }
                Ok(run) => {
                    debug!(run_id = %run.run_id, "Skipping run without stochastic marker");
                    loaded.filtered_out += 1;
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "Rejected run record");
                    loaded.rejected.push(RejectedRecord { path, error });
                }
            }
        }

        info!(
            dir = %self.dir.display(),
            runs = loaded.runs.len(),
            rejected = loaded.rejected.len(),
            filtered_out = loaded.filtered_out,
            "Run loading complete"
        );

        Ok(loaded)
    }

    fn matching_files(&self) -> Result<Vec<PathBuf>, RunError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| RunError::DirectoryUnreadable {
            path: self.dir.clone(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| self.filter.matches_file_name(name))
            })
            .collect();

        files.sort();
        Ok(files)
    }
}

fn load_run_file(path: &Path) -> Result<Run, RunError> {
    let content = fs::read_to_string(path).map_err(|source| RunError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Run::from_json(&content)
}
