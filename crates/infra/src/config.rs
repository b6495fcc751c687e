//! Engine configuration.
//!
//! Loads settings from environment variables; every key is optional.

use std::env;

use innkeep_commands::DEFAULT_MAX_HISTORY;

pub const MAX_HISTORY_KEY: &str = "INNKEEP_MAX_HISTORY";
pub const SNAPSHOTS_KEY: &str = "INNKEEP_SNAPSHOTS";
pub const SEED_CATALOG_KEY: &str = "INNKEEP_SEED_CATALOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Undo history cap; 0 = unlimited.
    pub max_history: usize,

    /// Roll back with whole-state snapshots instead of each command's own undo.
    pub snapshots: bool,

    /// Start with the standard 20-room catalog instead of an empty hotel.
    pub seed_catalog: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            snapshots: true,
            seed_catalog: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_history = match lookup(MAX_HISTORY_KEY) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: MAX_HISTORY_KEY,
                value: raw,
            })?,
            None => defaults.max_history,
        };

        let snapshots = match lookup(SNAPSHOTS_KEY) {
            Some(raw) => parse_flag(SNAPSHOTS_KEY, raw)?,
            None => defaults.snapshots,
        };

        let seed_catalog = match lookup(SEED_CATALOG_KEY) {
            Some(raw) => parse_flag(SEED_CATALOG_KEY, raw)?,
            None => defaults.seed_catalog,
        };

        Ok(Self {
            max_history,
            snapshots,
            seed_catalog,
        })
    }
}

fn parse_flag(key: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value: raw }),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for environment variable {key}")]
    InvalidValue { key: &'static str, value: String },
}
