use crate::cache::{decode_entry, encode_entry, CacheStore, MemoryCacheStore};
use crate::config::AnalyzerConfig;
use crate::core::cancellation::CancellationToken;
use crate::core::counter::count_tokens;
use crate::core::fingerprint::{self, CacheKey};
use crate::core::ranking::top_n;
use crate::core::reader::read_file_lowercased;
use crate::core::tokenizer::tokenize;
use crate::core::types::{
    AnalysisInput, AnalysisSource, CacheEntry, ExcludeSet, FileInput, FrequencyTable, RankedResult,
};
use crate::errors::AnalysisError;
use crate::persistence::DiskCacheStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Word-frequency analyzer: fingerprint, cache lookup, compute on miss, store.
///
/// Shareable across threads; concurrent requests share the injected store.
pub struct Analyzer {
    cache: Arc<dyn CacheStore>,
    config: AnalyzerConfig,
    in_flight: InFlight,
}

impl Analyzer {
    pub fn new(cache: Arc<dyn CacheStore>, config: AnalyzerConfig) -> Self {
        Self {
            cache,
            config,
            in_flight: InFlight::default(),
        }
    }

    pub fn in_memory(config: AnalyzerConfig) -> Self {
        let store = MemoryCacheStore::new(config.cache_capacity);
        Self::new(Arc::new(store), config)
    }

    /// Uses a disk store under `dir`, falling back to memory if the directory
    /// cannot be prepared.
    pub fn with_disk_cache_or_memory(dir: &Path, config: AnalyzerConfig) -> Self {
        match DiskCacheStore::open(dir) {
            Ok(store) => {
                match store.purge_expired() {
                    Ok(0) => {}
                    Ok(n) => tracing::debug!(dir = %dir.display(), removed = n, "purged expired cache files"),
                    Err(e) => tracing::debug!(dir = %dir.display(), error = %e, "cache purge failed"),
                }
                Self::new(Arc::new(store), config)
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "disk cache unavailable, using memory");
                Self::in_memory(config)
            }
        }
    }

    /// Boundary entry point. Exactly one of `text`/`file` must be given and
    /// `top` must be positive; both are normally checked upstream by
    /// [`crate::validation`] and are re-checked here.
    pub fn analyze_request(
        &self,
        text: Option<String>,
        file: Option<PathBuf>,
        top: i64,
        exclude: Vec<String>,
    ) -> Result<RankedResult, AnalysisError> {
        let source = match (text, file) {
            (Some(text), None) => AnalysisSource::Text(text),
            (None, Some(path)) => AnalysisSource::File(FileInput::new(path)),
            (Some(_), Some(_)) => {
                return Err(AnalysisError::invalid("only one of text or file may be given"))
            }
            (None, None) => return Err(AnalysisError::invalid("either text or file is required")),
        };
        let top = usize::try_from(top)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| AnalysisError::invalid("top must be a positive integer"))?;
        let input = AnalysisInput {
            source,
            exclude: ExcludeSet::new(exclude),
            top,
        };
        self.analyze(&input)
    }

    pub fn analyze(&self, input: &AnalysisInput) -> Result<RankedResult, AnalysisError> {
        self.analyze_with_cancel(input, &CancellationToken::new())
    }

    /// Returns a complete ranked result or an error, never a partial result.
    /// Cache failures are logged and otherwise ignored.
    pub fn analyze_with_cancel(
        &self,
        input: &AnalysisInput,
        cancel: &CancellationToken,
    ) -> Result<RankedResult, AnalysisError> {
        if input.top == 0 {
            return Err(AnalysisError::invalid("top must be a positive integer"));
        }
        cancel.check()?;

        let key = fingerprint::cache_key(
            Some(&input.source),
            &input.exclude,
            self.config.chunk_size,
            cancel,
        )?;

        if let Some(hit) = self.lookup(&key, input.top) {
            return Ok(hit);
        }

        if self.config.single_flight {
            self.in_flight.run(key.as_str(), || {
                // Another request may have filled the entry while we waited.
                if let Some(hit) = self.lookup(&key, input.top) {
                    return Ok(hit);
                }
                self.compute_and_store(&key, input, cancel)
            })
        } else {
            self.compute_and_store(&key, input, cancel)
        }
    }

    fn lookup(&self, key: &CacheKey, top: usize) -> Option<RankedResult> {
        let bytes = match self.cache.get(key.as_str()) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(key = %key, "cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache read failed, computing directly");
                return None;
            }
        };
        let entry = match decode_entry(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cached entry unreadable, computing directly");
                return None;
            }
        };
        let answer = entry.answer(top);
        match &answer {
            Some(_) => tracing::debug!(key = %key, top, "cache hit"),
            None => tracing::debug!(key = %key, top, cached_top = entry.top, "cached entry too narrow"),
        }
        answer
    }

    fn compute_and_store(
        &self,
        key: &CacheKey,
        input: &AnalysisInput,
        cancel: &CancellationToken,
    ) -> Result<RankedResult, AnalysisError> {
        let table = self.count(input, cancel)?;
        let ranked = top_n(&table, input.top)?;
        tracing::debug!(key = %key, distinct = table.len(), returned = ranked.len(), "computed frequencies");

        let entry = CacheEntry {
            top: input.top,
            entries: ranked,
        };
        self.store(key, &entry);
        Ok(entry.entries)
    }

    fn count(&self, input: &AnalysisInput, cancel: &CancellationToken) -> Result<FrequencyTable, AnalysisError> {
        cancel.check()?;
        match &input.source {
            AnalysisSource::Text(text) => Ok(count_tokens(tokenize(text), &input.exclude)),
            AnalysisSource::File(file) => {
                let text = read_file_lowercased(&file.path, self.config.chunk_size, file.size_hint, cancel)?;
                cancel.check()?;
                Ok(count_tokens(tokenize(&text), &input.exclude))
            }
        }
    }

    /// Best effort: a failed write only costs a future recomputation.
    fn store(&self, key: &CacheKey, entry: &CacheEntry) {
        let bytes = match encode_entry(entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "could not encode cache entry");
                return;
            }
        };
        if let Err(e) = self.cache.put(key.as_str(), bytes, self.config.cache_ttl()) {
            tracing::warn!(key = %key, error = %e, "cache write failed");
        }
    }
}

/// Per-key mutexes so that at most one computation runs for a key at a time.
#[derive(Default)]
struct InFlight {
    slots: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl InFlight {
    fn run<T>(&self, key: &str, f: impl FnOnce() -> T) -> T {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };

        let result = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        drop(slot);

        // Drop the slot once nobody else holds or waits on it.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.get(key).is_some_and(|s| Arc::strong_count(s) == 1) {
            slots.remove(key);
        }
        result
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
