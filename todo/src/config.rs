//! Environment-based configuration for the demo binary.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `TODO_SHELLS` | comma-separated shells to run: `local`, `reactive`, `observable` | all three |
//! | `TODO_SEED` | install the default records (`true`/`false`) | `true` |
//! | `TODO_BROADCAST_CAPACITY` | reactive store action channel capacity, `1..=65536` | `16` |
//!
//! # Example
//!
//! ```
//! use todo::config::{DemoConfig, ShellKind};
//!
//! let config = DemoConfig::from_lookup(|var| match var {
//!     "TODO_SHELLS" => Some("reactive, local".to_string()),
//!     _ => None,
//! })?;
//!
//! assert_eq!(config.shells, vec![ShellKind::Reactive, ShellKind::Local]);
//! assert!(config.seed);
//! # Ok::<(), todo::config::ConfigError>(())
//! ```

use composable_todo_runtime::{StoreConfig, MAX_BROADCAST_CAPACITY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Variable selecting which shells to run
pub const SHELLS_VAR: &str = "TODO_SHELLS";
/// Variable toggling the default records
pub const SEED_VAR: &str = "TODO_SEED";
/// Variable setting the reactive store's broadcast capacity
pub const BROADCAST_CAPACITY_VAR: &str = "TODO_BROADCAST_CAPACITY";

/// Configuration error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A shell name that is not one of the three known shells
    #[error("Unknown shell '{0}' (expected local, reactive or observable)")]
    UnknownShell(String),

    /// A variable holds a value that cannot be used
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
        /// What was expected
        reason: &'static str,
    },
}

/// The state-management strategy behind an app shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellKind {
    /// Owned local state with forced full updates
    Local,
    /// External store with selector subscriptions
    Reactive,
    /// Observable object with per-record observers
    Observable,
}

impl ShellKind {
    /// Every shell, in demo order
    pub const ALL: [Self; 3] = [Self::Local, Self::Reactive, Self::Observable];

    /// Lowercase name as used in `TODO_SHELLS`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Reactive => "reactive",
            Self::Observable => "observable",
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShellKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownShell(s.to_string()))
    }
}

/// Demo binary configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Shells to run, in order, without repeats
    pub shells: Vec<ShellKind>,
    /// Whether each shell starts with the default records
    pub seed: bool,
    /// Action broadcast capacity of the reactive store
    pub broadcast_capacity: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            shells: ShellKind::ALL.to_vec(),
            seed: true,
            broadcast_capacity: StoreConfig::default().broadcast_capacity,
        }
    }
}

impl DemoConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns error if any variable holds an unusable value
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Unset variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if any variable holds an unusable value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(SHELLS_VAR) {
            config.shells = parse_shells(&value)?;
        }
        if let Some(value) = lookup(SEED_VAR) {
            config.seed = parse_bool(SEED_VAR, &value)?;
        }
        if let Some(value) = lookup(BROADCAST_CAPACITY_VAR) {
            config.broadcast_capacity = parse_capacity(&value)?;
        }

        Ok(config)
    }

    /// Store configuration for the reactive shell
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.broadcast_capacity)
    }
}

fn parse_shells(value: &str) -> Result<Vec<ShellKind>, ConfigError> {
    let mut shells = Vec::new();
    for part in value.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let kind = part.parse::<ShellKind>()?;
        if !shells.contains(&kind) {
            shells.push(kind);
        }
    }

    if shells.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: SHELLS_VAR,
            value: value.to_string(),
            reason: "at least one shell is required",
        });
    }
    Ok(shells)
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "expected true or false",
        }),
    }
}

fn parse_capacity(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(capacity) if (1..=MAX_BROADCAST_CAPACITY).contains(&capacity) => Ok(capacity),
        _ => Err(ConfigError::InvalidValue {
            var: BROADCAST_CAPACITY_VAR,
            value: value.to_string(),
            reason: "expected an integer between 1 and 65536",
        }),
    }
}
