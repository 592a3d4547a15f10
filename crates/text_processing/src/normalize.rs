//! Text normalization
//!
//! Vietnamese users type with and without diacritics, so every matcher
//! compares text in a folded form:
//!
//! 1. compatibility decomposition (NFKD) and lowercasing
//! 2. combining marks U+0300..U+036F removed
//! 3. anything that is not a letter or digit becomes a space
//! 4. whitespace collapsed and trimmed
//!
//! `đ` has no decomposition and survives folding as-is.
//!
//! The advanced form additionally drops configured stop-words.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Fold text for matching
///
/// Deterministic and idempotent; empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .flat_map(char::to_lowercase)
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when `needle` occurs in `haystack` as whole words
///
/// Both sides are expected to be normalized, so spaces are the only
/// separators.
pub fn contains_words(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let left_ok = start == 0 || haystack[..start].ends_with(' ');
        let right_ok = end == haystack.len() || haystack[end..].starts_with(' ');
        left_ok && right_ok
    })
}

/// Words longer than one character, counting graphemes
pub fn significant_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ')
        .filter(|w| w.graphemes(true).nth(1).is_some())
}

/// Normalizer carrying a stop-word list
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    stop_words: HashSet<String>,
}

impl Normalizer {
    /// Stop-words are folded the same way as messages
    pub fn new<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = stop_words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { stop_words }
    }

    pub fn normalize(&self, text: &str) -> String {
        normalize(text)
    }

    /// `normalize` followed by stop-word removal
    pub fn advanced(&self, text: &str) -> String {
        normalize(text)
            .split(' ')
            .filter(|w| !w.is_empty() && !self.stop_words.contains(*w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}
