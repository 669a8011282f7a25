//! Analyzer configuration.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`WORDFREQ_*`)
//! 2. JSON config file, if one is given
//! 3. Compiled defaults

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::reader::DEFAULT_CHUNK_SIZE;
use crate::errors::ConfigError;

pub const ENV_CHUNK_SIZE: &str = "WORDFREQ_CHUNK_SIZE";
pub const ENV_CACHE_TTL_SECS: &str = "WORDFREQ_CACHE_TTL_SECS";
pub const ENV_SINGLE_FLIGHT: &str = "WORDFREQ_SINGLE_FLIGHT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Bytes per read when hashing and reading files. Default: 256 KiB.
    pub chunk_size: usize,
    /// Lifetime of a cached result. Default: 600 (10 minutes).
    pub cache_ttl_secs: u64,
    /// Collapse concurrent identical requests into one computation. Default: true.
    pub single_flight: bool,
    /// Entry bound for the in-memory store. Default: 10 000.
    pub cache_capacity: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            cache_ttl_secs: 600,
            single_flight: true,
            cache_capacity: 10_000,
        }
    }
}

impl AnalyzerConfig {
    /// Defaults, then `path` if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: display.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: display,
            message: e.to_string(),
        })
    }

    /// Applies overrides from a variable lookup. Taking the lookup as a closure
    /// keeps this testable without touching the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_CHUNK_SIZE) {
            self.chunk_size = parse_env(ENV_CHUNK_SIZE, &v)?;
        }
        if let Some(v) = lookup(ENV_CACHE_TTL_SECS) {
            self.cache_ttl_secs = parse_env(ENV_CACHE_TTL_SECS, &v)?;
        }
        if let Some(v) = lookup(ENV_SINGLE_FLIGHT) {
            self.single_flight = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_SINGLE_FLIGHT.to_string(),
                        message: format!("expected a boolean, got '{}'", other),
                    })
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chunk_size".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn parse_env<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: field.to_string(),
        message: e.to_string(),
    })
}
