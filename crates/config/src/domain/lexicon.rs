//! Word lists shared by several stages

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    /// Function words dropped by advanced normalization
    #[serde(default)]
    pub stop_words: Vec<String>,
    /// Normalized generic nouns that never identify a specific product
    #[serde(default)]
    pub generic_product_words: Vec<String>,
    /// Brand stems too vague to identify a product on their own
    #[serde(default)]
    pub ambiguous_brand_stems: Vec<String>,
    /// Ask for higher-rated products
    #[serde(default)]
    pub premium_cues: Vec<String>,
    /// Ask for cheaper products
    #[serde(default)]
    pub cheap_cues: Vec<String>,
}
