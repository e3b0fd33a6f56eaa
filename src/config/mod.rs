//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SELFCHECK_*` environment variables;
//! the binary layers its command-line flags on top.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_EMBED_CACHE_CAPACITY, DEFAULT_N_REFERENCE, DEFAULT_RUN_PREFIX, DEFAULT_STOCH_MARKER,
    DEFAULT_SWEEP_N_REFERENCE, DEFAULT_SWEEP_THRESHOLDS, DEFAULT_THRESHOLD,
};

/// How the embedding capability is provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbedderMode {
    /// Load the sentence encoder from `model_path`; fall back to lexical scoring
    /// when it is not configured or fails to load.
    #[default]
    Auto,
    /// Deterministic hashed bag-of-words embeddings (no model files).
    Stub,
    /// Skip embeddings entirely and score lexically.
    Lexical,
}

impl FromStr for EmbedderMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "stub" => Ok(Self::Stub),
            "lexical" => Ok(Self::Lexical),
            _ => Err(ConfigError::InvalidEmbedderMode {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for EmbedderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Stub => "stub",
            Self::Lexical => "lexical",
        })
    }
}

/// Analysis configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SELFCHECK_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding run JSON files. Default: `./data`.
    pub data_dir: PathBuf,

    /// Report path. Default: a per-analysis file name inside `data_dir`.
    pub output_path: Option<PathBuf>,

    /// Sentence-encoder directory (`config.json`, `tokenizer.json`, `model.safetensors`).
    pub model_path: Option<PathBuf>,

    /// Semantic similarity threshold. Default: `0.65`.
    pub threshold: f32,

    /// References per target in the single-pass analysis. Default: `5`.
    pub n_reference: usize,

    /// References per target in threshold sweeps. Default: `19`.
    pub sweep_n_reference: usize,

    /// Ascending thresholds for sweeps. Default: `0.50..=0.80` in steps of `0.05`.
    pub sweep_thresholds: Vec<f32>,

    /// Run file name prefix. Default: `PPH-001-`.
    pub run_prefix: String,

    /// Stochastic marker in file names and run ids. Default: `STOCH`.
    pub stoch_marker: String,

    /// Embedding provider selection. Default: `auto`.
    pub embedder: EmbedderMode,

    /// Max memoised embeddings. Default: `50_000`.
    pub cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            output_path: None,
            model_path: None,
            threshold: DEFAULT_THRESHOLD,
            n_reference: DEFAULT_N_REFERENCE,
            sweep_n_reference: DEFAULT_SWEEP_N_REFERENCE,
            sweep_thresholds: DEFAULT_SWEEP_THRESHOLDS.to_vec(),
            run_prefix: DEFAULT_RUN_PREFIX.to_string(),
            stoch_marker: DEFAULT_STOCH_MARKER.to_string(),
            embedder: EmbedderMode::default(),
            cache_capacity: DEFAULT_EMBED_CACHE_CAPACITY,
        }
    }
}

impl Config {
    const ENV_DATA_DIR: &'static str = "SELFCHECK_DATA_DIR";
    const ENV_OUTPUT_PATH: &'static str = "SELFCHECK_OUTPUT_PATH";
    const ENV_MODEL_PATH: &'static str = "SELFCHECK_MODEL_PATH";
    const ENV_THRESHOLD: &'static str = "SELFCHECK_THRESHOLD";
    const ENV_N_REFERENCE: &'static str = "SELFCHECK_N_REFERENCE";
    const ENV_SWEEP_N_REFERENCE: &'static str = "SELFCHECK_SWEEP_N_REFERENCE";
    const ENV_SWEEP_THRESHOLDS: &'static str = "SELFCHECK_SWEEP_THRESHOLDS";
    const ENV_RUN_PREFIX: &'static str = "SELFCHECK_RUN_PREFIX";
    const ENV_STOCH_MARKER: &'static str = "SELFCHECK_STOCH_MARKER";
    const ENV_EMBEDDER: &'static str = "SELFCHECK_EMBEDDER";
    const ENV_CACHE_CAPACITY: &'static str = "SELFCHECK_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir);
        let output_path = Self::parse_optional_path_from_env(Self::ENV_OUTPUT_PATH);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let threshold = match env::var(Self::ENV_THRESHOLD) {
            Ok(value) => parse_threshold(&value)?,
            Err(_) => defaults.threshold,
        };
        let n_reference = Self::parse_usize_from_env(Self::ENV_N_REFERENCE, defaults.n_reference);
        let sweep_n_reference =
            Self::parse_usize_from_env(Self::ENV_SWEEP_N_REFERENCE, defaults.sweep_n_reference);
        let sweep_thresholds = match env::var(Self::ENV_SWEEP_THRESHOLDS) {
            Ok(value) => parse_thresholds(&value)?,
            Err(_) => defaults.sweep_thresholds,
        };
        let run_prefix = Self::parse_string_from_env(Self::ENV_RUN_PREFIX, defaults.run_prefix);
        let stoch_marker =
            Self::parse_string_from_env(Self::ENV_STOCH_MARKER, defaults.stoch_marker);
        let embedder = match env::var(Self::ENV_EMBEDDER) {
            Ok(value) => value.parse()?,
            Err(_) => defaults.embedder,
        };
        let cache_capacity =
            Self::parse_u64_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity);

        Ok(Self {
            data_dir,
            output_path,
            model_path,
            threshold,
            n_reference,
            sweep_n_reference,
            sweep_thresholds,
            run_prefix,
            stoch_marker,
            embedder,
            cache_capacity,
        })
    }

    /// Validates ranges and the data directory (does not create directories).
    ///
    /// `model_path` is not checked here: an unusable model is reported by the
    /// embedding provider, which falls back to lexical scoring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }

        validate_thresholds(&self.sweep_thresholds)?;

        if self.n_reference == 0 {
            return Err(ConfigError::InvalidReferenceCount {
                setting: "n_reference",
            });
        }
        if self.sweep_n_reference == 0 {
            return Err(ConfigError::InvalidReferenceCount {
                setting: "sweep_n_reference",
            });
        }

        if !self.data_dir.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.data_dir.clone(),
            });
        }
        if !self.data_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.data_dir.clone(),
            });
        }

        Ok(())
    }

    /// Report path for an analysis: `output_path` if set, else `data_dir/default_name`.
    pub fn output_path_or(&self, default_name: &str) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(default_name))
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

/// Parses a single threshold in `0.0..=1.0`.
pub fn parse_threshold(value: &str) -> Result<f32, ConfigError> {
    let threshold: f32 =
        value
            .trim()
            .parse()
            .map_err(|source| ConfigError::ThresholdParseError {
                value: value.to_string(),
                source,
            })?;

    if !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::InvalidThreshold { value: threshold });
    }

    Ok(threshold)
}

/// Parses a comma-separated, strictly ascending threshold list.
pub fn parse_thresholds(value: &str) -> Result<Vec<f32>, ConfigError> {
    let thresholds = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_threshold)
        .collect::<Result<Vec<_>, _>>()?;

    validate_thresholds(&thresholds)?;
    Ok(thresholds)
}

fn validate_thresholds(thresholds: &[f32]) -> Result<(), ConfigError> {
    if thresholds.is_empty() {
        return Err(ConfigError::InvalidSweepThresholds {
            reason: "at least one threshold is required".to_string(),
        });
    }

    if let Some(pair) = thresholds.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(ConfigError::InvalidSweepThresholds {
            reason: format!(
                "thresholds must be strictly ascending ({:.2} is followed by {:.2})",
                pair[0], pair[1]
            ),
        });
    }

    if let Some(value) = thresholds.iter().find(|t| !(0.0..=1.0).contains(*t)) {
        return Err(ConfigError::InvalidThreshold { value: *value });
    }

    Ok(())
}
