/*!
 * Configuration
 * Simulation parameters from defaults, JSON files and the environment
 *
 * Sources are layered: built-in defaults, then an optional JSON file, then
 * `MEMSIM_*` environment variables. Command-line flags are applied last by
 * the binary.
 */

use crate::core::limits::{DEFAULT_CAPACITY, DEFAULT_QUANTUM};
use crate::core::types::{Size, Tick};
use crate::memory::Strategy;
use crate::scheduler::Quantum;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const ENV_CAPACITY: &str = "MEMSIM_CAPACITY";
pub const ENV_STRATEGY: &str = "MEMSIM_STRATEGY";
pub const ENV_QUANTUM: &str = "MEMSIM_QUANTUM";

/// Configuration result
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {}", path.display())]
    #[diagnostic(code(config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}", path.display())]
    #[diagnostic(
        code(config::parse),
        help("Expected a JSON object with optional keys: capacity, strategy, quantum.")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value {value:?} for {key}: {reason}")]
    #[diagnostic(code(config::invalid_value))]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Capacity must be positive")]
    #[diagnostic(code(config::zero_capacity))]
    ZeroCapacity,

    #[error("Quantum must be positive")]
    #[diagnostic(code(config::zero_quantum))]
    ZeroQuantum,
}

fn default_capacity() -> Size {
    DEFAULT_CAPACITY
}

fn default_quantum() -> Tick {
    DEFAULT_QUANTUM
}

/// Simulation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Total address-space size
    #[serde(default = "default_capacity")]
    pub capacity: Size,
    #[serde(default)]
    pub strategy: Strategy,
    /// Time advanced per tick
    #[serde(default = "default_quantum")]
    pub quantum: Tick,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            strategy: Strategy::default(),
            quantum: DEFAULT_QUANTUM,
        }
    }
}

impl SimConfig {
    /// Load from a JSON file; missing keys fall back to defaults
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?config, "Loaded config file");
        Ok(config)
    }

    /// Apply `MEMSIM_*` environment overrides
    pub fn with_env(self) -> ConfigResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_CAPACITY) {
            self.capacity = parse_number(ENV_CAPACITY, &value)?;
        }
        if let Some(value) = lookup(ENV_STRATEGY) {
            self.strategy = value.parse().map_err(|reason| ConfigError::InvalidValue {
                key: ENV_STRATEGY,
                value: value.clone(),
                reason,
            })?;
        }
        if let Some(value) = lookup(ENV_QUANTUM) {
            self.quantum = parse_number(ENV_QUANTUM, &value)?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        Ok(())
    }

    pub fn quantum(&self) -> ConfigResult<Quantum> {
        Quantum::new(self.quantum).map_err(|_| ConfigError::ZeroQuantum)
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
