//! Configuration system for RosterForge.
//!
//! Load engine configuration from TOML or YAML files to control sampling,
//! scoring weights and result selection without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use rosterforge_config::{EngineConfig, SamplingConfig};
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     random_seed = 7
//!     top_n = 5
//!
//!     [stat_weights]
//!     level = 2.0
//!
//!     [sampling]
//!     type = "fixed"
//!     n_samples = 50000
//! "#).unwrap();
//!
//! assert_eq!(config.top_n, 5);
//! assert_eq!(config.stat_weights.level, 2.0);
//! assert_eq!(config.stat_weights.speed, 1.0);
//! assert!(matches!(config.sampling, SamplingConfig::Fixed(_)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use rosterforge_config::EngineConfig;
//!
//! let config = EngineConfig::load("rosterforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

mod raw;

use std::path::Path;

use rosterforge_core::{ConstraintSet, RosterForgeError, TeamShape};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use raw::{RawConstraints, RawIdGroups, RawTeamKey};

/// Results returned when nothing else is configured.
pub const DEFAULT_TOP_N: usize = 3;

/// First adaptive round, and the observed budget for unconstrained runs.
pub const DEFAULT_INITIAL_SAMPLES: u64 = 10_000;

/// Multiplier applied between adaptive rounds.
pub const DEFAULT_GROWTH_FACTOR: u64 = 10;

/// Cumulative adaptive sample cap.
pub const DEFAULT_MAX_SAMPLES: u64 = 1_000_000;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for RosterForgeError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(msg) => RosterForgeError::Config(msg),
            other => RosterForgeError::Config(other.to_string()),
        }
    }
}

/// Main engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of threads used to sample and score candidates.
    #[serde(default)]
    pub thread_count: ThreadCount,

    /// Maximum number of combinations returned.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Largest player overlap allowed between two returned combinations.
    ///
    /// Defaults to half the team size when unset.
    #[serde(default)]
    pub diversity_threshold: Option<f64>,

    /// Per-stat weights for the balance score.
    #[serde(default)]
    pub stat_weights: StatWeightsConfig,

    /// Sampling budget.
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Team shape, when the caller does not supply one per run.
    #[serde(default)]
    pub team_shape: Option<TeamShapeConfig>,

    /// Grouping constraints in loose form.
    #[serde(default)]
    pub constraints: Option<RawConstraints>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            thread_count: ThreadCount::default(),
            top_n: DEFAULT_TOP_N,
            diversity_threshold: None,
            stat_weights: StatWeightsConfig::default(),
            sampling: SamplingConfig::default(),
            team_shape: None,
            constraints: None,
        }
    }
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl EngineConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the number of returned combinations.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Sets the diversity threshold.
    pub fn with_diversity_threshold(mut self, threshold: f64) -> Self {
        self.diversity_threshold = Some(threshold);
        self
    }

    /// Sets the stat weights.
    pub fn with_stat_weights(mut self, level: f64, stamina: f64, speed: f64) -> Self {
        self.stat_weights = StatWeightsConfig {
            level,
            stamina,
            speed,
        };
        self
    }

    /// Uses a fixed sample budget.
    pub fn with_fixed_samples(mut self, n_samples: u64) -> Self {
        self.sampling = SamplingConfig::Fixed(FixedSamplingConfig { n_samples });
        self
    }

    /// Uses the given sampling configuration.
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Sets the thread count.
    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.thread_count = thread_count;
        self
    }

    /// Sets the default team shape.
    pub fn with_team_shape(mut self, teams: usize, size: usize) -> Self {
        self.team_shape = Some(TeamShapeConfig { teams, size });
        self
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        if let Some(threshold) = self.diversity_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "diversity_threshold must be a non-negative number, got {threshold}"
                )));
            }
        }
        if let ThreadCount::Count(0) = self.thread_count {
            return Err(ConfigError::Invalid(
                "thread_count must be at least 1".into(),
            ));
        }
        self.stat_weights.validate()?;
        self.sampling.validate()?;
        if let Some(shape) = &self.team_shape {
            shape.to_shape()?;
        }
        Ok(())
    }

    /// Normalizes the configured constraints, if any.
    ///
    /// Pinned team numbers are range-checked against `team_shape` when one
    /// is configured.
    pub fn constraint_set(&self) -> Result<ConstraintSet, ConfigError> {
        let teams = self.team_shape.as_ref().map(|s| s.teams);
        match &self.constraints {
            Some(raw) => raw.normalize(teams),
            None => Ok(ConstraintSet::new()),
        }
    }
}

/// Thread count for sampling and scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// Use the global thread pool.
    #[default]
    Auto,

    /// Run on the calling thread only.
    None,

    /// Specific number of threads.
    Count(usize),
}

/// Per-stat balance weights.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StatWeightsConfig {
    #[serde(default = "unit_weight")]
    pub level: f64,

    #[serde(default = "unit_weight")]
    pub stamina: f64,

    #[serde(default = "unit_weight")]
    pub speed: f64,
}

impl Default for StatWeightsConfig {
    fn default() -> Self {
        Self {
            level: 1.0,
            stamina: 1.0,
            speed: 1.0,
        }
    }
}

fn unit_weight() -> f64 {
    1.0
}

impl StatWeightsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, weight) in [
            ("level", self.level),
            ("stamina", self.stamina),
            ("speed", self.speed),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "stat weight '{name}' must be a non-negative number, got {weight}"
                )));
            }
        }
        Ok(())
    }
}

/// Sampling budget configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SamplingConfig {
    /// Draw exactly `n_samples` candidates.
    Fixed(FixedSamplingConfig),

    /// Grow the budget geometrically until enough results are found.
    Adaptive(AdaptiveSamplingConfig),
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig::Adaptive(AdaptiveSamplingConfig::default())
    }
}

impl SamplingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            SamplingConfig::Fixed(fixed) => {
                if fixed.n_samples == 0 {
                    return Err(ConfigError::Invalid("n_samples must be at least 1".into()));
                }
            }
            SamplingConfig::Adaptive(adaptive) => {
                let initial = adaptive.initial_samples();
                if initial == 0 {
                    return Err(ConfigError::Invalid(
                        "initial_samples must be at least 1".into(),
                    ));
                }
                if adaptive.growth_factor() < 2 {
                    return Err(ConfigError::Invalid(
                        "growth_factor must be at least 2".into(),
                    ));
                }
                if adaptive.max_samples() < initial {
                    return Err(ConfigError::Invalid(format!(
                        "max_samples ({}) is below initial_samples ({initial})",
                        adaptive.max_samples()
                    )));
                }
                if adaptive.min_results == Some(0) {
                    return Err(ConfigError::Invalid(
                        "min_results must be at least 1".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Fixed sampling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FixedSamplingConfig {
    /// Number of candidate partitions to draw.
    pub n_samples: u64,
}

/// Adaptive sampling configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdaptiveSamplingConfig {
    /// Samples drawn in the first round.
    pub initial_samples: Option<u64>,

    /// Budget multiplier between rounds.
    pub growth_factor: Option<u64>,

    /// Cumulative sample cap.
    pub max_samples: Option<u64>,

    /// Results wanted before stopping early. Defaults to `top_n`.
    pub min_results: Option<usize>,
}

impl AdaptiveSamplingConfig {
    pub fn initial_samples(&self) -> u64 {
        self.initial_samples.unwrap_or(DEFAULT_INITIAL_SAMPLES)
    }

    pub fn growth_factor(&self) -> u64 {
        self.growth_factor.unwrap_or(DEFAULT_GROWTH_FACTOR)
    }

    pub fn max_samples(&self) -> u64 {
        self.max_samples.unwrap_or(DEFAULT_MAX_SAMPLES)
    }
}

/// Team shape in configuration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamShapeConfig {
    pub teams: usize,
    pub size: usize,
}

impl TeamShapeConfig {
    /// Converts into a validated [`TeamShape`].
    pub fn to_shape(&self) -> Result<TeamShape, ConfigError> {
        TeamShape::new(self.teams, self.size).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
