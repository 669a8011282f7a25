// src/lib.rs

pub mod cache;
pub mod config;
pub mod core;
pub mod errors;
pub mod persistence;
pub mod validation;

pub use crate::cache::{CacheStore, MemoryCacheStore};
pub use crate::config::AnalyzerConfig;
pub use crate::core::cancellation::CancellationToken;
pub use crate::core::engine::Analyzer;
pub use crate::core::types::{AnalysisInput, AnalysisSource, ExcludeSet, FileInput, RankedEntry, RankedResult};
pub use crate::errors::{AnalysisError, CacheError, ConfigError};
pub use crate::persistence::DiskCacheStore;
pub use crate::validation::{RawRequest, ValidationErrors};
