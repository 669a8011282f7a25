// src/core/counter.rs
use crate::core::types::{ExcludeSet, FrequencyTable};

/// Accumulates token counts, skipping excluded words.
pub struct FrequencyCounter<'a> {
    exclude: &'a ExcludeSet,
    table: FrequencyTable,
}

impl<'a> FrequencyCounter<'a> {
    pub fn new(exclude: &'a ExcludeSet) -> Self {
        Self {
            exclude,
            table: FrequencyTable::new(),
        }
    }

    /// Counts one token. O(1) amortized.
    pub fn add(&mut self, token: String) {
        if self.exclude.contains(&token) {
            return;
        }
        *self.table.entry(token).or_insert(0) += 1;
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, tokens: I) {
        for token in tokens {
            self.add(token);
        }
    }

    pub fn finish(self) -> FrequencyTable {
        self.table
    }
}

/// Counts every token of `tokens` not present in `exclude`.
pub fn count_tokens<I>(tokens: I, exclude: &ExcludeSet) -> FrequencyTable
where
    I: IntoIterator<Item = String>,
{
    let mut counter = FrequencyCounter::new(exclude);
    counter.extend(tokens);
    counter.finish()
}
