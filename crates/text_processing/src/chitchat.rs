//! Small-talk detection
//!
//! Independent of intent classification: a message can be both a greeting
//! and a business request.

use shopbot_config::ChitchatRule;
use shopbot_core::ChitchatType;

use crate::normalize::Normalizer;

pub struct ChitchatDetector {
    normalizer: Normalizer,
    rules: Vec<(ChitchatType, Vec<String>)>,
}

impl ChitchatDetector {
    pub fn new(rules: &[ChitchatRule], normalizer: Normalizer) -> Self {
        let rules = rules
            .iter()
            .filter(|r| r.kind != ChitchatType::None)
            .map(|r| {
                let keywords = r
                    .keywords
                    .iter()
                    .map(|k| normalizer.advanced(k))
                    .filter(|k| !k.is_empty())
                    .collect();
                (r.kind, keywords)
            })
            .collect();

        Self { normalizer, rules }
    }

    /// First small-talk type with a keyword inside the message
    pub fn detect(&self, message: &str) -> ChitchatType {
        let folded = self.normalizer.advanced(message);
        if folded.is_empty() {
            return ChitchatType::None;
        }

        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k.as_str())))
            .map(|(kind, _)| *kind)
            .unwrap_or(ChitchatType::None)
    }
}
