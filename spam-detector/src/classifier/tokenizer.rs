//! Word tokenizer
//!
//! Lowercases text, extracts words of two or more word characters and drops
//! English stop words.

use regex::Regex;
use std::collections::HashSet;

use super::stop_words::ENGLISH_STOP_WORDS;

const WORD_PATTERN: &str = r"\b\w\w+\b";

/// Text tokenizer
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
    stop_words: HashSet<&'static str>,
}

impl Tokenizer {
    /// Tokenizer using the built-in English stop-word list
    pub fn new() -> Self {
        Self::with_stop_words(ENGLISH_STOP_WORDS)
    }

    pub fn with_stop_words(stop_words: &[&'static str]) -> Self {
        Self {
            // Literal pattern, always valid
            pattern: Regex::new(WORD_PATTERN).unwrap(),
            stop_words: stop_words.iter().copied().collect(),
        }
    }

    /// Split text into lowercase, non-stop-word tokens, in order of appearance
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
