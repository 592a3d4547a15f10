//! Centralized constants for the dialog engine
//!
//! Single source of truth for the default values behind `EngineSettings`.
//! The relevance thresholds and the TTL are empirical; they are exposed as
//! settings rather than tuned here.

/// Relevance thresholds (all scores in `[0, 1]`)
pub mod matching {
    /// FAQ word-overlap (intersection over union) must exceed this
    pub const FAQ_SIMILARITY_THRESHOLD: f64 = 0.7;

    /// Fuzzy index: accept top hit when its distance score is at most this
    pub const FUZZY_MAX_SCORE: f64 = 0.35;

    /// Weighted word-overlap: accept best product when its score exceeds this
    pub const OVERLAP_MIN_SCORE: f64 = 0.3;

    /// Fuzzy field weights
    pub const FUZZY_NAME_WEIGHT: f64 = 0.7;
    pub const FUZZY_BRAND_WEIGHT: f64 = 0.2;
    pub const FUZZY_CATEGORY_WEIGHT: f64 = 0.1;

    /// Queries shorter than this never reach the fuzzy index
    pub const FUZZY_MIN_QUERY_CHARS: usize = 2;

    /// Word weights for the overlap scorer
    pub const OVERLAP_NAME_WORD_WEIGHT: f64 = 1.5;
    pub const OVERLAP_BRAND_WORD_WEIGHT: f64 = 1.3;
}

/// Session lifetimes
pub mod session {
    /// Conversation context TTL (seconds)
    pub const CONTEXT_TTL_SECS: u64 = 10 * 60;

    /// Current-product pointer TTL (seconds)
    pub const PRODUCT_TTL_SECS: u64 = 10 * 60;
}

/// Reply composition defaults
pub mod replies {
    /// Bulk quote form
    pub const QUOTE_FORM_URL: &str = "/quote.html";

    /// Budget assumed for "cheap" requests without a number (VND)
    pub const DEFAULT_CHEAP_BUDGET: u64 = 250_000;

    /// Products surfaced by listings, recommendations and fallbacks
    pub const TOP_N: usize = 3;
}

/// Server defaults
pub mod server {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 3000;
    pub const CATALOG_PATH: &str = "data/catalog.json";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_in_unit_range() {
        for t in [
            matching::FAQ_SIMILARITY_THRESHOLD,
            matching::FUZZY_MAX_SCORE,
            matching::OVERLAP_MIN_SCORE,
        ] {
            assert!((0.0..=1.0).contains(&t));
        }
    }

    #[test]
    fn test_fuzzy_weights_sum_to_one() {
        let sum = matching::FUZZY_NAME_WEIGHT
            + matching::FUZZY_BRAND_WEIGHT
            + matching::FUZZY_CATEGORY_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
