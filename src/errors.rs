//! Error types. One enum per subsystem, `thiserror` only.

use std::io;
use std::path::PathBuf;

pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const INPUT_ERROR: &str = "INPUT_ERROR";
pub const CANCELLED: &str = "CANCELLED";
pub const CACHE_UNAVAILABLE: &str = "CACHE_UNAVAILABLE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";

/// Failures that abort an analysis. No partial result is ever returned
/// alongside one of these.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read input {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => INVALID_ARGUMENT,
            Self::Input { .. } => INPUT_ERROR,
            Self::Cancelled => CANCELLED,
        }
    }
}

/// Cache store failures. Always non-fatal to the analysis itself.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("cache I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cache entry could not be encoded or decoded: {0}")]
    Codec(#[from] bincode::Error),
}

impl CacheError {
    pub fn error_code(&self) -> &'static str {
        CACHE_UNAVAILABLE
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        CONFIG_ERROR
    }
}
