use std::io::Cursor;

use proptest::prelude::*;
use wordfreq_core::core::cancellation::CancellationToken;
use wordfreq_core::core::counter::count_tokens;
use wordfreq_core::core::reader::read_lowercased;
use wordfreq_core::core::tokenizer::tokenize;
use wordfreq_core::{AnalysisInput, Analyzer, AnalyzerConfig, ExcludeSet};

// Includes letters whose lowercase form expands ('İ') or is context
// dependent ('Σ'), plus bare combining marks.
const TEXT: &str = "[a-zA-Z0-9_ ,.!?'\\-\n\tàéÉÖüİıΣσςẞßǅⅫ\u{301}\u{307}\u{345}]{0,200}";
const WORDS: &str = "([a-eA-E]{1,3}[ .,]){0,60}";

proptest! {
    #[test]
    fn retokenizing_tokens_is_stable(s in TEXT) {
        let first: Vec<String> = tokenize(&s).collect();
        let second: Vec<String> = tokenize(&first.join(" ")).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn chunk_size_never_changes_counts(s in TEXT, chunk in 1usize..64) {
        let exclude = ExcludeSet::default();
        let whole = count_tokens(tokenize(&s), &exclude);
        let text = read_lowercased(Cursor::new(s.as_bytes()), chunk, None, &CancellationToken::new()).unwrap();
        let chunked = count_tokens(tokenize(&text), &exclude);
        prop_assert_eq!(whole, chunked);
    }

    #[test]
    fn output_is_ranked_and_bounded(s in WORDS, top in 1usize..8) {
        let analyzer = Analyzer::in_memory(AnalyzerConfig::default());
        let result = analyzer.analyze(&AnalysisInput::text(s.clone(), top)).unwrap();

        let distinct = count_tokens(tokenize(&s), &ExcludeSet::default()).len();
        prop_assert_eq!(result.len(), top.min(distinct));
        for pair in result.windows(2) {
            let ordered = pair[0].count > pair[1].count
                || (pair[0].count == pair[1].count && pair[0].word < pair[1].word);
            prop_assert!(ordered, "{:?} before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn excluded_words_never_appear(s in WORDS, excluded in "[a-eA-E]{1,3}") {
        let analyzer = Analyzer::in_memory(AnalyzerConfig::default());
        let input = AnalysisInput::text(s, 100).with_exclude([excluded.clone()]);
        let result = analyzer.analyze(&input).unwrap();
        let lowered = excluded.to_lowercase();
        prop_assert!(result.iter().all(|e| e.word != lowered));
    }

    #[test]
    fn warm_cache_matches_cold(s in WORDS, top in 1usize..8) {
        let analyzer = Analyzer::in_memory(AnalyzerConfig::default());
        let input = AnalysisInput::text(s, top);
        let cold = analyzer.analyze(&input).unwrap();
        let warm = analyzer.analyze(&input).unwrap();
        prop_assert_eq!(cold, warm);
    }
}
