//! Specific-product gate
//!
//! A resolved product is only trusted for a price quote when the message
//! names something product-specific: a word (longer than two characters)
//! taken from some product name or brand, excluding generic nouns such as
//! "giá" or "sản phẩm". A vague brand stem alone is not enough.

use std::collections::BTreeSet;

use shopbot_config::Lexicon;
use shopbot_core::CatalogSnapshot;
use shopbot_text_processing::Normalizer;

use super::GenerationCache;

pub struct ProductKeywordGate {
    normalizer: Normalizer,
    generic_words: BTreeSet<String>,
    ambiguous_stems: Vec<String>,
    keywords: GenerationCache<Vec<String>>,
}

impl ProductKeywordGate {
    pub fn new(lexicon: &Lexicon, normalizer: Normalizer) -> Self {
        let fold = |words: &[String]| -> Vec<String> {
            words
                .iter()
                .map(|w| normalizer.normalize(w))
                .filter(|w| !w.is_empty())
                .collect()
        };
        let generic_words = fold(&lexicon.generic_product_words).into_iter().collect();
        let ambiguous_stems = fold(&lexicon.ambiguous_brand_stems);

        Self {
            normalizer,
            generic_words,
            ambiguous_stems,
            keywords: GenerationCache::new(),
        }
    }

    fn build_keywords(&self, catalog: &CatalogSnapshot) -> Vec<String> {
        let mut keywords = BTreeSet::new();
        for product in &catalog.products {
            let sources = std::iter::once(product.name.as_str()).chain(product.brand.as_deref());
            for source in sources {
                let folded = self.normalizer.advanced(source);
                keywords.extend(
                    folded
                        .split(' ')
                        .filter(|w| w.chars().count() > 2 && !self.generic_words.contains(*w))
                        .map(str::to_string),
                );
            }
        }
        keywords.into_iter().collect()
    }

    /// `query` must already be folded with `Normalizer::advanced`
    pub fn has_specific_product_name(&self, query: &str, catalog: &CatalogSnapshot) -> bool {
        if query.is_empty() {
            return false;
        }
        let keywords = self
            .keywords
            .get_or_build(catalog, || self.build_keywords(catalog));

        let mut matching = keywords.iter().filter(|k| query.contains(k.as_str()));

        let mentions_stem = self.ambiguous_stems.iter().any(|s| query.contains(s.as_str()));
        if mentions_stem {
            return matching.any(|k| !self.ambiguous_stems.contains(k));
        }
        matching.next().is_some()
    }
}
