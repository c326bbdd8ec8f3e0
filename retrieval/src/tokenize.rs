//! Lowercase word tokenization shared by queries and segments.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::config::TokenizerConfig;

/// Common English function words dropped when stop-word filtering is on.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "through",
    "during", "before", "after", "above", "below", "between", "under", "again", "further",
    "then", "once", "here", "there", "when", "where", "why", "how", "all", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "just", "and", "but", "if", "or", "because", "until", "while", "what",
    "which", "who", "whom", "this", "that", "these", "those", "am", "i", "my", "me", "we", "our",
    "you", "your", "he", "she", "it", "they", "them", "his", "her", "its", "their",
];

/// Whether `word` (already lowercase) is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Splits text into lowercase alphanumeric runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    /// Create a tokenizer with the given settings.
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    /// Tokenize `text` in order of appearance.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .filter(|word| self.keep(word))
            .collect()
    }

    /// Count every token of `text`.
    pub fn term_counts(&self, text: &str) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for token in self.tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        counts
    }

    fn keep(&self, word: &str) -> bool {
        word.chars().count() >= self.config.min_token_len
            && !(self.config.remove_stop_words && is_stop_word(word))
    }
}

/// Most frequent content words of `text`; ties go to the earlier word.
///
/// Stop words and words of two characters or fewer are skipped regardless
/// of tokenizer settings.
pub fn key_terms(text: &str, top_n: usize) -> Vec<String> {
    let tokenizer = Tokenizer::new(TokenizerConfig {
        remove_stop_words: true,
        min_token_len: 3,
    });

    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, token) in tokenizer.tokenize(text).into_iter().enumerate() {
        counts.entry(token).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });
    ranked
        .into_iter()
        .take(top_n)
        .map(|(term, _)| term)
        .collect()
}
