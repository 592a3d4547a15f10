//! Intent Detection
//!
//! Deterministic keyword classification over the rule tables:
//! 1. category-listing phrases (plain containment) pre-empt everything
//! 2. the ordered rule table, keywords matched as whole words
//! 3. the recommend keywords, also whole words
//! 4. otherwise `none`

use shopbot_config::IntentRules;
use shopbot_core::Intent;
use shopbot_text_processing::{contains_words, normalize};

/// Rule-table intent classifier
pub struct IntentMatcher {
    category_listing: Vec<String>,
    rules: Vec<(Intent, Vec<String>)>,
    recommend: Vec<String>,
}

fn fold_all(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| normalize(k))
        .filter(|k| !k.is_empty())
        .collect()
}

impl IntentMatcher {
    pub fn new(rules: &IntentRules) -> Self {
        Self {
            category_listing: fold_all(&rules.category_listing),
            rules: rules
                .rules
                .iter()
                .map(|r| (r.intent, fold_all(&r.keywords)))
                .collect(),
            recommend: fold_all(&rules.recommend),
        }
    }

    /// Classify a raw message
    pub fn classify(&self, message: &str) -> Intent {
        let text = normalize(message);
        if text.is_empty() {
            return Intent::None;
        }

        if self.category_listing.iter().any(|p| text.contains(p.as_str())) {
            return Intent::ListCategories;
        }

        if let Some((intent, _)) = self
            .rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| contains_words(&text, k)))
        {
            return *intent;
        }

        if self.recommend.iter().any(|k| contains_words(&text, k)) {
            return Intent::Recommend;
        }

        Intent::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopbot_config::DomainData;

    fn matcher() -> IntentMatcher {
        IntentMatcher::new(&DomainData::embedded().unwrap().intents)
    }

    #[test]
    fn test_quote_single() {
        let matcher = matcher();
        assert_eq!(matcher.classify("báo giá áo thun basic trắng"), Intent::QuoteSingle);
        assert_eq!(matcher.classify("giá sản phẩm"), Intent::QuoteSingle);
        assert_eq!(matcher.classify("Áo này GIÁ bao nhiêu?"), Intent::QuoteSingle);
    }

    #[test]
    fn test_keyword_must_be_whole_word() {
        let matcher = matcher();
        // "giá" folds to "gia", which is embedded in "giai"
        assert_eq!(matcher.classify("giải"), Intent::None);
        assert_eq!(matcher.classify("giải thưởng"), Intent::None);
    }

    #[test]
    fn test_bulk_wins_over_single() {
        assert_eq!(matcher().classify("báo giá bộ sản phẩm"), Intent::QuoteBulk);
        assert_eq!(matcher().classify("mua sỉ áo thun"), Intent::QuoteBulk);
    }

    #[test]
    fn test_category_listing_preempts_rules() {
        assert_eq!(matcher().classify("xem danh mục giá rẻ"), Intent::ListCategories);
        assert_eq!(matcher().classify("categories"), Intent::ListCategories);
    }

    #[test]
    fn test_other_intents() {
        let matcher = matcher();
        assert_eq!(matcher.classify("tư vấn"), Intent::Consulting);
        assert_eq!(matcher.classify("xin chào"), Intent::Greeting);
        assert_eq!(matcher.classify("thông tin hoodie"), Intent::ProductInfo);
        assert_eq!(matcher.classify("bảng size quần jean"), Intent::SizeInfo);
        assert_eq!(matcher.classify("còn hàng không"), Intent::StockInfo);
    }

    #[test]
    fn test_recommend_after_rules() {
        let matcher = matcher();
        assert_eq!(matcher.classify("gợi ý cho mình"), Intent::Recommend);
        assert_eq!(matcher.classify("nên mua gì"), Intent::Consulting);
    }

    #[test]
    fn test_none() {
        let matcher = matcher();
        assert_eq!(matcher.classify("hôm nay trời đẹp"), Intent::None);
        assert_eq!(matcher.classify("???"), Intent::None);
    }
}
