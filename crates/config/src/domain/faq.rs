use serde::{Deserialize, Serialize};

/// One FAQ answer with the question variants that trigger it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: String,
    pub questions: Vec<String>,
    /// Returned verbatim
    pub answer: String,
}
