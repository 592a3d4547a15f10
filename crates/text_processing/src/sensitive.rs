//! Profanity filter
//!
//! Runs before anything else in a turn. Tokens are compared in folded
//! form, which makes some innocent words collide with offensive ones
//! ("vải" and "vãi" both fold to "vai"). For those tokens, and for
//! phrases listed the same way, the raw message must also contain the
//! accented offensive spelling. Phrases match on word boundaries.

use std::collections::{HashMap, HashSet};

use shopbot_config::SensitiveWords;
use unicode_normalization::UnicodeNormalization;

use crate::normalize::{contains_words, Normalizer};

pub struct SensitiveFilter {
    normalizer: Normalizer,
    words: HashSet<String>,
    phrases: Vec<String>,
    /// folded token or phrase -> lowercase accented forms confirming it
    ambiguous: HashMap<String, Vec<String>>,
}

impl SensitiveFilter {
    pub fn new(config: &SensitiveWords, normalizer: Normalizer) -> Self {
        let mut words = HashSet::new();
        let mut phrases = Vec::new();

        for entry in config.words.iter().chain(config.phrases.iter()) {
            let folded = normalizer.advanced(entry);
            if folded.is_empty() {
                continue;
            }
            if folded.contains(' ') {
                phrases.push(folded);
            } else {
                words.insert(folded);
            }
        }

        let ambiguous = config
            .ambiguous
            .iter()
            .map(|(token, forms)| {
                (
                    normalizer.normalize(token),
                    forms.iter().map(|f| compose_lower(f)).collect(),
                )
            })
            .collect();

        tracing::debug!(words = words.len(), phrases = phrases.len(), "Sensitive filter built");
        Self {
            normalizer,
            words,
            phrases,
            ambiguous,
        }
    }

    /// First offensive token or phrase in `message`, folded
    pub fn detect(&self, message: &str) -> Option<String> {
        let folded = self.normalizer.advanced(message);
        if folded.is_empty() {
            return None;
        }

        let mut raw_lower: Option<String> = None;
        let mut confirmed = |key: &str| match self.ambiguous.get(key) {
            Some(forms) => {
                let raw = raw_lower.get_or_insert_with(|| compose_lower(message));
                forms.iter().any(|f| raw.contains(f.as_str()))
            }
            None => true,
        };

        for token in folded.split(' ') {
            if self.words.contains(token) && confirmed(token) {
                return Some(token.to_string());
            }
        }

        self.phrases
            .iter()
            .find(|p| contains_words(&folded, p) && confirmed(p))
            .cloned()
    }
}

/// Lowercase NFC, so precomposed and combining spellings compare equal
fn compose_lower(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> SensitiveFilter {
        let yaml = r#"
words: ["vãi", "vcl", "đéo", "lồn"]
phrases: ["thằng ngu"]
ambiguous:
  vai: ["vãi"]
  đeo: ["đéo"]
  lon: ["lồn"]
"#;
        let config: SensitiveWords = serde_yaml::from_str(yaml).unwrap();
        SensitiveFilter::new(&config, Normalizer::new(["là", "của"]))
    }

    #[test]
    fn test_plain_word_detected() {
        assert_eq!(filter().detect("áo này VCL thật"), Some("vcl".to_string()));
    }

    #[test]
    fn test_accented_offensive_form_detected() {
        assert_eq!(filter().detect("đẹp vãi"), Some("vai".to_string()));
        assert_eq!(filter().detect("đéo mua"), Some("đeo".to_string()));
        // decomposed input still confirms the accented form
        assert_eq!(filter().detect("v\u{0061}\u{0303}i"), Some("vai".to_string()));
    }

    #[test]
    fn test_homonym_with_safe_spelling_passes() {
        let filter = filter();
        assert_eq!(filter.detect("áo vải cotton"), None);
        assert_eq!(filter.detect("áo rộng vai"), None);
        assert_eq!(filter.detect("đeo thử được không"), None);
        assert_eq!(filter.detect("mua 2 lon nước"), None);
    }

    #[test]
    fn test_phrase_detected() {
        assert_eq!(filter().detect("Thằng ngu!"), Some("thang ngu".to_string()));
        assert_eq!(filter().detect("đúng là thằng ngu thật"), Some("thang ngu".to_string()));
    }

    #[test]
    fn test_phrase_needs_word_boundaries() {
        let yaml = r#"
words: []
phrases: ["con điên", "đồ ngốc"]
ambiguous:
  con đien: ["con điên"]
"#;
        let config: SensitiveWords = serde_yaml::from_str(yaml).unwrap();
        let filter = SensitiveFilter::new(&config, Normalizer::default());
        assert_eq!(filter.detect("còn điện thoại không"), None);
        assert_eq!(filter.detect("đồ con điên"), Some("con đien".to_string()));
        assert_eq!(filter.detect("xem đồ ngốc nghếch"), Some("đo ngoc".to_string()));
        assert_eq!(filter.detect("đồ ngốcx"), None);
    }

    #[test]
    fn test_empty_and_clean_messages() {
        let filter = filter();
        assert_eq!(filter.detect(""), None);
        assert_eq!(filter.detect("là của"), None);
        assert_eq!(filter.detect("báo giá áo thun basic trắng"), None);
    }
}
