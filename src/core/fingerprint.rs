//! Cache keys derived from input content and the exclusion set.
//!
//! A key is `<namespace>-<blake3 hex>` over
//! `content || 0x1F || excluded words joined by ','`, the words being the
//! sorted lowercase contents of an [`ExcludeSet`]. Text and file inputs
//! live in separate namespaces so identical bytes supplied both ways never
//! share an entry. Files are hashed by streaming every chunk, which is the
//! first of two passes over a file input; the second (tokenizing) pass only
//! runs on a cache miss.

use crate::core::cancellation::CancellationToken;
use crate::core::reader::ChunkedReader;
use crate::core::types::{AnalysisSource, ExcludeSet};
use crate::errors::AnalysisError;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const TEXT_NAMESPACE: &str = "word-frequency";
pub const FILE_NAMESPACE: &str = "word-frequency-file";
pub const SENTINEL_KEY: &str = "word-frequency-default";

const SEPARATOR: u8 = 0x1f;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used when no input is present at all.
    pub fn sentinel() -> Self {
        Self(SENTINEL_KEY.to_string())
    }

    fn finish(namespace: &str, mut hasher: blake3::Hasher, exclude: &ExcludeSet) -> Self {
        hasher.update(&[SEPARATOR]);
        for (i, word) in exclude.iter().enumerate() {
            if i > 0 {
                hasher.update(b",");
            }
            hasher.update(word.as_bytes());
        }
        Self(format!("{}-{}", namespace, hasher.finalize().to_hex()))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn text_key(text: &str, exclude: &ExcludeSet) -> CacheKey {
    let mut hasher = blake3::Hasher::new();
    hasher.update(text.as_bytes());
    CacheKey::finish(TEXT_NAMESPACE, hasher, exclude)
}

/// Hashes a byte stream chunk by chunk.
pub fn stream_key<R: Read>(
    reader: R,
    exclude: &ExcludeSet,
    chunk_size: usize,
    cancel: &CancellationToken,
    path: &Path,
) -> Result<CacheKey, AnalysisError> {
    let mut hasher = blake3::Hasher::new();
    ChunkedReader::new(reader, chunk_size)
        .for_each_chunk(cancel, |chunk| {
            hasher.update(chunk);
        })
        .map_err(|e| e.at(path))?;
    Ok(CacheKey::finish(FILE_NAMESPACE, hasher, exclude))
}

pub fn file_key(
    path: &Path,
    exclude: &ExcludeSet,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> Result<CacheKey, AnalysisError> {
    let file = File::open(path).map_err(|e| AnalysisError::input(path, e))?;
    stream_key(file, exclude, chunk_size, cancel, path)
}

/// Key for an optional source. `None` maps to the sentinel key.
pub fn cache_key(
    source: Option<&AnalysisSource>,
    exclude: &ExcludeSet,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> Result<CacheKey, AnalysisError> {
    match source {
        Some(AnalysisSource::Text(text)) => Ok(text_key(text, exclude)),
        Some(AnalysisSource::File(file)) => file_key(&file.path, exclude, chunk_size, cancel),
        None => Ok(CacheKey::sentinel()),
    }
}
