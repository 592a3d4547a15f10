//! Sensitive vocabulary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Normalized token mapped to the accented spellings that confirm it is
/// the offensive word rather than an innocent homonym
pub type AmbiguousForms = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensitiveWords {
    /// Single tokens, compared after normalization
    #[serde(default)]
    pub words: Vec<String>,
    /// Multi-word phrases, matched as substrings of the normalized message
    #[serde(default)]
    pub phrases: Vec<String>,
    #[serde(default)]
    pub ambiguous: AmbiguousForms,
}
