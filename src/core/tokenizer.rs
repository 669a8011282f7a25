// src/core/tokenizer.rs
use unicode_normalization::char::is_combining_mark;

/// Letters, digits, underscore and combining marks.
///
/// Marks are included because lowercasing can emit them ('İ' folds to
/// "i\u{307}"); a folded token must still be a single token.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || is_combining_mark(c)
}

/// Lazily splits text into lowercase word tokens.
///
/// A token is a maximal run of word characters; everything else is a
/// delimiter and is dropped.
pub struct Tokens<'a> {
    rest: &'a str,
}

pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { rest: text }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let start = self.rest.find(is_word_char)?;
        let tail = &self.rest[start..];
        let end = tail.find(|c: char| !is_word_char(c)).unwrap_or(tail.len());
        let (word, rest) = tail.split_at(end);
        self.rest = rest;
        Some(lowercase(word))
    }
}

fn lowercase(word: &str) -> String {
    if word.is_ascii() {
        word.to_ascii_lowercase()
    } else {
        word.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        tokenize(text).collect()
    }

    #[test]
    fn splits_on_non_word_characters() {
        assert_eq!(tokens("Hello, world! It's 2024."), vec!["hello", "world", "it", "s", "2024"]);
    }

    #[test]
    fn underscore_and_digits_are_word_characters() {
        assert_eq!(tokens("snake_case v2"), vec!["snake_case", "v2"]);
    }

    #[test]
    fn empty_and_delimiter_only_input() {
        assert!(tokens("").is_empty());
        assert!(tokens("  ...  \n\t--").is_empty());
    }

    #[test]
    fn folds_non_ascii_letters() {
        assert_eq!(tokens("ÉCOLE école"), vec!["école", "école"]);
    }

    #[test]
    fn dotted_capital_i_folds_to_one_token() {
        let first = tokens("İstanbul");
        assert_eq!(first, vec!["i\u{307}stanbul"]);
        assert_eq!(tokens(&first.join(" ")), first);
    }

    #[test]
    fn combining_marks_stay_inside_words() {
        assert_eq!(tokens("cafe\u{301} noir"), vec!["cafe\u{301}", "noir"]);
    }

    #[test]
    fn final_sigma_is_stable_on_retokenizing() {
        let first = tokens("ΟΔΟΣ Σ");
        assert_eq!(tokens(&first.join(" ")), first);
    }

    #[test]
    fn retokenizing_lowercased_output_is_stable() {
        let first = tokens("The QUICK brown_Fox jumps");
        let second = tokens(&first.join(" "));
        assert_eq!(first, second);
    }
}
