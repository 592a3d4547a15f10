//! FAQ lookup
//!
//! A question variant matches when the message contains it, when it
//! contains the message, or when the two share enough words (intersection
//! over union above the threshold). The first entry
//! with a matching variant wins.

use std::collections::HashSet;

use shopbot_config::FaqEntry;

use crate::normalize::Normalizer;

struct CompiledFaq {
    id: String,
    questions: Vec<String>,
    answer: String,
}

pub struct FaqMatcher {
    normalizer: Normalizer,
    entries: Vec<CompiledFaq>,
    threshold: f64,
}

impl FaqMatcher {
    pub fn new(entries: &[FaqEntry], normalizer: Normalizer, threshold: f64) -> Self {
        let entries = entries
            .iter()
            .map(|e| CompiledFaq {
                id: e.id.clone(),
                questions: e
                    .questions
                    .iter()
                    .map(|q| normalizer.advanced(q))
                    .filter(|q| !q.is_empty())
                    .collect(),
                answer: e.answer.clone(),
            })
            .collect();

        Self {
            normalizer,
            entries,
            threshold,
        }
    }

    /// Answer for `message`, if any question variant matches
    pub fn find(&self, message: &str) -> Option<&str> {
        self.find_entry(message).map(|(_, answer)| answer)
    }

    /// Matching entry as `(id, answer)`
    pub fn find_entry(&self, message: &str) -> Option<(&str, &str)> {
        let folded = self.normalizer.advanced(message);
        if folded.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|entry| entry.questions.iter().any(|q| self.matches(&folded, q)))
            .map(|entry| (entry.id.as_str(), entry.answer.as_str()))
    }

    fn matches(&self, message: &str, question: &str) -> bool {
        message.contains(question)
            || question.contains(message)
            || word_overlap(message, question) > self.threshold
    }
}

/// Intersection over union of the two word sets
pub fn word_overlap(a: &str, b: &str) -> f64 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}
