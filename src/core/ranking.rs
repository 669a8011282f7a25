// src/core/ranking.rs
use crate::core::types::{FrequencyTable, RankedEntry, RankedResult};
use crate::errors::AnalysisError;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Higher count ranks first; equal counts rank by word ascending.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct Rank<'a> {
    count: u64,
    word: Reverse<&'a str>,
}

/// Selects the `n` highest-count entries of `table`.
///
/// Output is sorted by count descending, ties broken lexicographically
/// ascending on the word. If `n` exceeds the number of distinct words every
/// entry is returned. O(d log n) for d distinct words.
pub fn top_n(table: &FrequencyTable, n: usize) -> Result<RankedResult, AnalysisError> {
    if n == 0 {
        return Err(AnalysisError::invalid("top must be a positive integer"));
    }

    // Min-heap of the best `n` seen so far; the root is the weakest survivor.
    let mut heap: BinaryHeap<Reverse<Rank<'_>>> = BinaryHeap::with_capacity(n.min(table.len()) + 1);
    for (word, &count) in table {
        let rank = Rank {
            count,
            word: Reverse(word.as_str()),
        };
        if heap.len() < n {
            heap.push(Reverse(rank));
        } else if let Some(Reverse(weakest)) = heap.peek() {
            if rank > *weakest {
                heap.pop();
                heap.push(Reverse(rank));
            }
        }
    }

    // Ascending `Reverse<Rank>` is descending rank: strongest first.
    Ok(heap
        .into_sorted_vec()
        .into_iter()
        .map(|Reverse(rank)| RankedEntry::new(rank.word.0, rank.count))
        .collect())
}
