//! Configuration model for stepforge.
//!
//! Load solver configuration from TOML or YAML to control the environment
//! mode, move threads, termination and the local search phases without code
//! changes.
//!
//! # Examples
//!
//! ```
//! use stepforge_config::{MoveThreadCount, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     environment_mode = "reproducible"
//!     random_seed = 7
//!     move_thread_count = { count = 2 }
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [[phases]]
//!     type = "local_search"
//!     [phases.acceptor]
//!     type = "late_acceptance"
//!     late_acceptance_size = 400
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.move_thread_count, MoveThreadCount::Count(2));
//! assert_eq!(config.phases.len(), 1);
//! ```

mod move_selector;
mod selection;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stepforge_core::StepforgeError;
use thiserror::Error;

pub use move_selector::{
    ChangeMoveConfig, MoveSelectorConfig, MoveSelectorKind, SwapMoveConfig,
    UnionMoveSelectorConfig,
};
pub use selection::{SelectionCacheType, SelectionOrder, SorterOrder};

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

impl From<ConfigError> for StepforgeError {
    fn from(err: ConfigError) -> Self {
        StepforgeError::Config(err.to_string())
    }
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of threads evaluating moves in parallel.
    #[serde(default)]
    pub move_thread_count: MoveThreadCount,

    /// Number of moves handed to move threads ahead of the deciding thread.
    #[serde(default)]
    pub move_thread_buffer_size: Option<usize>,

    /// Solver-wide termination, combined with each phase's own termination.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking the format by extension.
    ///
    /// `.yaml` and `.yml` files are read as YAML, everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_move_thread_count(mut self, move_thread_count: MoveThreadCount) -> Self {
        self.move_thread_count = move_thread_count;
        self
    }

    pub fn with_move_thread_buffer_size(mut self, buffer_size: usize) -> Self {
        self.move_thread_buffer_size = Some(buffer_size);
        self
    }

    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    /// Returns the termination time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Resolves the move thread count, `None` meaning single-threaded.
    pub fn resolved_move_thread_count(&self) -> Result<Option<usize>, ConfigError> {
        self.move_thread_count.resolve()
    }

    /// Resolves the look-ahead buffer for `move_thread_count` threads.
    ///
    /// Defaults to ten moves per thread and is never smaller than the
    /// thread count.
    pub fn resolved_move_thread_buffer_size(
        &self,
        move_thread_count: usize,
    ) -> Result<usize, ConfigError> {
        let buffer_size = self
            .move_thread_buffer_size
            .unwrap_or(move_thread_count * 10);
        if buffer_size < move_thread_count {
            return Err(ConfigError::Invalid(format!(
                "The move_thread_buffer_size ({}) must be at least the move_thread_count ({}).",
                buffer_size, move_thread_count
            )));
        }
        Ok(buffer_size)
    }

    /// Seed for all random selection, drawn fresh in non-reproducible mode.
    pub fn resolved_random_seed(&self) -> Option<u64> {
        match (self.random_seed, self.environment_mode) {
            (Some(seed), _) => Some(seed),
            (None, EnvironmentMode::NonReproducible) => None,
            (None, _) => Some(0),
        }
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Reproducible mode with deterministic behavior.
    Reproducible,

    /// Asserts undo scores and step scores.
    FastAssert,

    /// Additionally recalculates every move score from scratch.
    FullAssert,
}

impl EnvironmentMode {
    /// Returns true if any score assertion runs.
    pub fn is_asserted(self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }

    /// Returns true if every move score is checked against a from-scratch score.
    pub fn is_fully_asserted(self) -> bool {
        self == EnvironmentMode::FullAssert
    }

    pub fn is_reproducible(self) -> bool {
        self != EnvironmentMode::NonReproducible
    }
}

/// Move thread count configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveThreadCount {
    /// Use the available cores minus two, at most four.
    Auto,

    /// No move threads; moves are evaluated on the solver thread.
    #[default]
    None,

    /// Specific number of threads.
    Count(usize),
}

impl MoveThreadCount {
    /// Maximum thread count picked by `Auto`.
    pub const AUTO_LIMIT: usize = 4;

    /// Returns the number of move threads, `None` meaning single-threaded.
    pub fn resolve(self) -> Result<Option<usize>, ConfigError> {
        match self {
            MoveThreadCount::None => Ok(None),
            MoveThreadCount::Count(0) => Err(ConfigError::Invalid(
                "The move_thread_count must be at least 1.".to_string(),
            )),
            MoveThreadCount::Count(count) => Ok(Some(count)),
            MoveThreadCount::Auto => {
                let available = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1);
                // Leave one core for the OS and one for the solver thread.
                let count = available.saturating_sub(2).min(Self::AUTO_LIMIT);
                Ok((count > 1).then_some(count))
            }
        }
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    pub seconds_spent_limit: Option<u64>,

    pub milliseconds_spent_limit: Option<u64>,

    /// Target best score, e.g. `"0"` or `"0hard/0soft"`.
    pub best_score_limit: Option<String>,

    pub step_count_limit: Option<u64>,

    pub unimproved_step_count_limit: Option<u64>,

    /// Maximum number of evaluated moves.
    pub move_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self.seconds_spent_limit.unwrap_or(0) * 1000
            + self.milliseconds_spent_limit.unwrap_or(0);
        (millis > 0).then(|| Duration::from_millis(millis))
    }

    /// Returns true if no limit is configured.
    pub fn is_empty(&self) -> bool {
        self.time_limit().is_none()
            && self.best_score_limit.is_none()
            && self.step_count_limit.is_none()
            && self.unimproved_step_count_limit.is_none()
            && self.move_count_limit.is_none()
    }
}

/// Phase configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    LocalSearch(LocalSearchConfig),
}

/// Local search configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalSearchConfig {
    pub acceptor: Option<AcceptorConfig>,

    pub forager: Option<ForagerConfig>,

    /// Move selector tree; a union of change and swap moves when omitted.
    pub move_selector: Option<MoveSelectorConfig>,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

/// Acceptor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptorConfig {
    /// Only accept moves that improve on the last step score.
    HillClimbing,

    SimulatedAnnealing(SimulatedAnnealingConfig),

    LateAcceptance(LateAcceptanceConfig),
}

impl AcceptorConfig {
    /// Accepted count limit used when the forager config leaves it open.
    pub fn default_accepted_count_limit(&self) -> usize {
        match self {
            AcceptorConfig::HillClimbing => usize::MAX,
            AcceptorConfig::SimulatedAnnealing(_) | AcceptorConfig::LateAcceptance(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    pub starting_temperature: Option<f64>,

    /// Factor applied to the temperature after every step.
    pub decay_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LateAcceptanceConfig {
    pub late_acceptance_size: Option<usize>,
}

/// Forager configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ForagerConfig {
    /// Stop evaluating a step after this many accepted moves.
    pub accepted_count_limit: Option<usize>,

    pub pick_early_type: Option<PickEarlyType>,
}

/// Pick early type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickEarlyType {
    #[default]
    Never,

    /// Pick the first accepted move that beats the best score.
    FirstBestScoreImproving,

    /// Pick the first accepted move that beats the last step score.
    FirstLastStepScoreImproving,
}
