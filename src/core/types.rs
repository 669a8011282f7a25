// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// Word token -> occurrence count. Keys are lowercase.
pub type FrequencyTable = HashMap<String, u64>;

/// Ordered output of an analysis: count descending, ties by word ascending.
pub type RankedResult = Vec<RankedEntry>;

/// A single row of the ranked output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub word: String,
    pub count: u64,
}

impl RankedEntry {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Words removed from the count. Lowercased, deduplicated and kept sorted so
/// that two requests naming the same words in a different order are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeSet {
    words: BTreeSet<String>,
}

impl ExcludeSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Sorted iteration, used when fingerprinting.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// A file to analyze. `size_hint` is used to pre-size the read buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub path: PathBuf,
    pub size_hint: Option<u64>,
}

impl FileInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size_hint: None,
        }
    }
}

/// Exactly one of inline text or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisSource {
    Text(String),
    File(FileInput),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    pub source: AnalysisSource,
    pub exclude: ExcludeSet,
    pub top: usize,
}

impl AnalysisInput {
    pub fn text(text: impl Into<String>, top: usize) -> Self {
        Self {
            source: AnalysisSource::Text(text.into()),
            exclude: ExcludeSet::default(),
            top,
        }
    }

    pub fn file(file: FileInput, top: usize) -> Self {
        Self {
            source: AnalysisSource::File(file),
            exclude: ExcludeSet::default(),
            top,
        }
    }

    pub fn with_exclude<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude = ExcludeSet::new(words);
        self
    }
}

/// What the cache holds for a key: the ranked entries and the `top` they were
/// truncated to, so a later request for a wider `top` can tell whether the
/// entry is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub top: usize,
    pub entries: RankedResult,
}

impl CacheEntry {
    /// Returns the first `top` entries if this entry can answer a request for
    /// `top`, otherwise `None`.
    pub fn answer(&self, top: usize) -> Option<RankedResult> {
        let complete = self.entries.len() < self.top;
        if top <= self.top || complete {
            Some(self.entries.iter().take(top).cloned().collect())
        } else {
            None
        }
    }
}
