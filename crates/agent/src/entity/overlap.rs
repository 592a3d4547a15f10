//! Weighted word-overlap scorer
//!
//! Each significant query word weighs 1.0, 1.5 when it occurs in the
//! product name, or 1.3 when it occurs in the brand (brand wins). A word
//! counts as matched when it equals, contains or is contained in any
//! significant word of the product's name, brand and category. The score
//! is matched weight over total weight.

use shopbot_config::constants::matching::{OVERLAP_BRAND_WORD_WEIGHT, OVERLAP_NAME_WORD_WEIGHT};
use shopbot_core::{CatalogSnapshot, Product};
use shopbot_text_processing::{significant_words, Normalizer};

use super::{EntityResolver, GenerationCache};

struct FoldedProduct {
    name: String,
    brand: Option<String>,
    words: Vec<String>,
}

pub struct OverlapResolver {
    min_score: f64,
    normalizer: Normalizer,
    folded: GenerationCache<Vec<FoldedProduct>>,
}

impl OverlapResolver {
    pub fn new(min_score: f64, normalizer: Normalizer) -> Self {
        Self {
            min_score,
            normalizer,
            folded: GenerationCache::new(),
        }
    }

    fn fold_catalog(&self, catalog: &CatalogSnapshot) -> Vec<FoldedProduct> {
        catalog
            .products
            .iter()
            .map(|p| {
                let text = format!("{} {} {}", p.name, p.brand_or_empty(), p.category_or_empty());
                let all = self.normalizer.advanced(&text);
                FoldedProduct {
                    name: self.normalizer.advanced(&p.name),
                    brand: p.brand.as_deref().map(|b| self.normalizer.advanced(b)),
                    words: significant_words(&all).map(str::to_string).collect(),
                }
            })
            .collect()
    }
}

fn similarity(query_words: &[&str], product: &FoldedProduct) -> f64 {
    let mut matched = 0.0;
    let mut total = 0.0;

    for word in query_words {
        let mut weight = 1.0;
        if product.name.contains(word) {
            weight = OVERLAP_NAME_WORD_WEIGHT;
        }
        if product.brand.as_deref().is_some_and(|b| b.contains(word)) {
            weight = OVERLAP_BRAND_WORD_WEIGHT;
        }
        total += weight;

        let hit = product
            .words
            .iter()
            .any(|p| p == word || p.contains(word) || word.contains(p.as_str()));
        if hit {
            matched += weight;
        }
    }

    if total == 0.0 {
        0.0
    } else {
        matched / total
    }
}

impl EntityResolver for OverlapResolver {
    fn name(&self) -> &'static str {
        "overlap"
    }

    fn resolve(&self, query: &str, catalog: &CatalogSnapshot) -> Option<Product> {
        let query_words: Vec<&str> = significant_words(query).collect();
        if query_words.is_empty() {
            return None;
        }

        let folded = self
            .folded
            .get_or_build(catalog, || self.fold_catalog(catalog));

        let mut best: Option<(usize, f64)> = None;
        for (position, product) in folded.iter().enumerate() {
            let score = similarity(&query_words, product);
            let beats_best = best.map_or(score > 0.0, |(_, s)| score > s);
            if beats_best && score > self.min_score {
                best = Some((position, score));
            }
        }

        best.and_then(|(position, _)| catalog.products.get(position).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::fixtures;

    fn resolver() -> OverlapResolver {
        OverlapResolver::new(0.3, Normalizer::new(["cho", "minh"]))
    }

    #[test]
    fn test_name_words_dominate() {
        let catalog = fixtures::catalog();
        let found = resolver().resolve("quan jean slim", &catalog).unwrap();
        assert_eq!(found.id, "p004");
    }

    #[test]
    fn test_first_product_wins_ties() {
        // p001 and p002 share every word here
        let found = resolver().resolve("ao thun basic", &fixtures::catalog()).unwrap();
        assert_eq!(found.id, "p001");
    }

    #[test]
    fn test_partial_words_count() {
        // "sneaker" is contained in "sneakers"
        let found = resolver().resolve("sneaker", &fixtures::catalog()).unwrap();
        assert_eq!(found.id, "p010");
    }

    #[test]
    fn test_similarity_weights() {
        let product = FoldedProduct {
            name: "hoodie".into(),
            brand: None,
            words: vec!["hoodie".into()],
        };
        // one of two unit-weight words would be 0.5; here 1.5 of 2.5
        assert!((similarity(&["hoodie", "qqq"], &product) - 0.6).abs() < 1e-9);
        assert_eq!(similarity(&["qqq"], &product), 0.0);
    }

    #[test]
    fn test_brand_weight_overrides_name() {
        let product = FoldedProduct {
            name: "levis 501".into(),
            brand: Some("levis".into()),
            words: vec!["levis".into(), "501".into()],
        };
        // "levis" weighs 1.3 (brand), "zzz" 1.0
        let score = similarity(&["levis", "zzz"], &product);
        assert!((score - 1.3 / 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_no_match() {
        assert!(resolver().resolve("xyz qwe", &fixtures::catalog()).is_none());
        assert!(resolver().resolve("", &fixtures::catalog()).is_none());
    }
}
