//! Fuzzy product index
//!
//! Scores each product field by approximate substring edit distance
//! (Sellers' variant of Levenshtein: the pattern may start anywhere in the
//! text) divided by the pattern length, taking the better of the two
//! directions. Field scores are combined as a weighted mean over the
//! fields a product actually has. 0 is a perfect match, 1 no match.

use shopbot_config::FuzzyWeights;
use shopbot_core::{CatalogSnapshot, Product};
use shopbot_text_processing::Normalizer;
use thiserror::Error;

use super::{EntityResolver, GenerationCache};

#[derive(Error, Debug, PartialEq)]
pub enum FuzzyIndexError {
    #[error("Invalid fuzzy weight for {field}: {value}")]
    InvalidWeight { field: &'static str, value: f64 },

    #[error("Fuzzy weights must not all be zero")]
    ZeroWeights,

    #[error("Fuzzy score threshold out of range: {0}")]
    InvalidThreshold(f64),
}

struct IndexedProduct {
    name: Vec<char>,
    brand: Option<Vec<char>>,
    category: Option<Vec<char>>,
}

struct FuzzyIndex {
    entries: Vec<IndexedProduct>,
}

pub struct FuzzyResolver {
    weights: FuzzyWeights,
    max_score: f64,
    min_query_chars: usize,
    normalizer: Normalizer,
    index: GenerationCache<FuzzyIndex>,
}

impl FuzzyResolver {
    pub fn new(
        weights: FuzzyWeights,
        max_score: f64,
        min_query_chars: usize,
        normalizer: Normalizer,
    ) -> Result<Self, FuzzyIndexError> {
        for (field, value) in [
            ("name", weights.name),
            ("brand", weights.brand),
            ("category", weights.category),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FuzzyIndexError::InvalidWeight { field, value });
            }
        }
        if weights.name + weights.brand + weights.category <= 0.0 {
            return Err(FuzzyIndexError::ZeroWeights);
        }
        if !(0.0..=1.0).contains(&max_score) {
            return Err(FuzzyIndexError::InvalidThreshold(max_score));
        }

        Ok(Self {
            weights,
            max_score,
            min_query_chars,
            normalizer,
            index: GenerationCache::new(),
        })
    }

    fn build_index(&self, catalog: &CatalogSnapshot) -> FuzzyIndex {
        let fold = |text: &str| -> Option<Vec<char>> {
            let folded = self.normalizer.advanced(text);
            (!folded.is_empty()).then(|| folded.chars().collect())
        };

        let entries = catalog
            .products
            .iter()
            .map(|p| IndexedProduct {
                name: fold(&p.name).unwrap_or_default(),
                brand: p.brand.as_deref().and_then(fold),
                category: p.category_id.as_deref().and_then(fold),
            })
            .collect();

        tracing::debug!(generation = catalog.generation, products = catalog.len(), "Fuzzy index built");
        FuzzyIndex { entries }
    }

    fn score(&self, query: &[char], entry: &IndexedProduct) -> f64 {
        let fields = [
            (Some(&entry.name), self.weights.name),
            (entry.brand.as_ref(), self.weights.brand),
            (entry.category.as_ref(), self.weights.category),
        ];

        let mut weighted = 0.0;
        let mut total = 0.0;
        for (field, weight) in fields {
            let Some(field) = field else { continue };
            if field.is_empty() || weight == 0.0 {
                continue;
            }
            weighted += weight * field_score(query, field);
            total += weight;
        }

        if total == 0.0 {
            1.0
        } else {
            weighted / total
        }
    }
}

impl EntityResolver for FuzzyResolver {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn resolve(&self, query: &str, catalog: &CatalogSnapshot) -> Option<Product> {
        let query: Vec<char> = query.chars().collect();
        if query.len() < self.min_query_chars {
            return None;
        }

        let index = self
            .index
            .get_or_build(catalog, || self.build_index(catalog));

        let mut best: Option<(usize, f64)> = None;
        for (position, entry) in index.entries.iter().enumerate() {
            let score = self.score(&query, entry);
            if best.map_or(true, |(_, s)| score < s) {
                best = Some((position, score));
            }
        }

        let (position, score) = best?;
        if score <= self.max_score {
            catalog.products.get(position).cloned()
        } else {
            None
        }
    }
}

/// Better of the two containment directions, in `[0, 1]`
fn field_score(query: &[char], field: &[char]) -> f64 {
    let forward = substring_distance(query, field) as f64 / query.len() as f64;
    let backward = substring_distance(field, query) as f64 / field.len() as f64;
    forward.min(backward).min(1.0)
}

/// Edits needed to make `pattern` occur somewhere inside `text`
fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    if pattern.is_empty() {
        return 0;
    }
    // Row 0 is all zeros: a match may begin at any text position
    let mut prev = vec![0usize; text.len() + 1];
    let mut curr = vec![0usize; text.len() + 1];

    for (i, p) in pattern.iter().enumerate() {
        curr[0] = i + 1;
        for (j, t) in text.iter().enumerate() {
            let substitution = prev[j] + usize::from(p != t);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev.into_iter().min().unwrap_or(pattern.len())
}
