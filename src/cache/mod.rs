//! Cache store capability injected into the analyzer.
//!
//! Stores are byte-oriented: the analyzer encodes a [`CacheEntry`] with
//! bincode before `put` and decodes after `get`. Any error from a store is
//! non-fatal to an analysis.

pub mod memory;

pub use memory::MemoryCacheStore;

use crate::core::types::CacheEntry;
use crate::errors::CacheError;
use std::time::Duration;

/// Get/put by key with a per-entry TTL. Implementations must be safe to share
/// between threads; expiry and eviction are their own business.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;
}

pub fn encode_entry(entry: &CacheEntry) -> Result<Vec<u8>, CacheError> {
    Ok(bincode::serialize(entry)?)
}

pub fn decode_entry(bytes: &[u8]) -> Result<CacheEntry, CacheError> {
    Ok(bincode::deserialize(bytes)?)
}

/// A store that holds nothing. Every lookup misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheStore;

impl CacheStore for NoopCacheStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }
}
