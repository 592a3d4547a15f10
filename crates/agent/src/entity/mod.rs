//! Product resolution
//!
//! Maps free text to a catalog product through a chain of resolvers tried
//! in order. The fuzzy index comes first when it could be built; the
//! weighted word-overlap scorer is always available behind it.
//!
//! All resolvers receive the message folded by `Normalizer::advanced`.

mod fuzzy;
mod gate;
mod overlap;

pub use fuzzy::{FuzzyIndexError, FuzzyResolver};
pub use gate::ProductKeywordGate;
pub use overlap::OverlapResolver;

use std::sync::Arc;

use parking_lot::RwLock;
use shopbot_config::MatchingSettings;
use shopbot_core::{CatalogSnapshot, Product};
use shopbot_text_processing::Normalizer;

/// Strategy for mapping a folded message to one product
pub trait EntityResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Best product for `query`, or `None` when nothing clears the threshold
    fn resolve(&self, query: &str, catalog: &CatalogSnapshot) -> Option<Product>;
}

/// Ordered fallback chain of resolvers
pub struct ResolverChain {
    resolvers: Vec<Box<dyn EntityResolver>>,
}

impl ResolverChain {
    pub fn new(resolvers: Vec<Box<dyn EntityResolver>>) -> Self {
        Self { resolvers }
    }

    /// Fuzzy then overlap; fuzzy is skipped when disabled or misconfigured
    pub fn from_settings(settings: &MatchingSettings, normalizer: &Normalizer) -> Self {
        let mut resolvers: Vec<Box<dyn EntityResolver>> = Vec::new();

        if settings.fuzzy_enabled {
            match FuzzyResolver::new(
                settings.fuzzy_weights,
                settings.fuzzy_max_score,
                settings.fuzzy_min_query_chars,
                normalizer.clone(),
            ) {
                Ok(fuzzy) => resolvers.push(Box::new(fuzzy)),
                Err(e) => {
                    tracing::warn!(error = %e, "Fuzzy product index disabled, using word overlap only")
                }
            }
        }

        resolvers.push(Box::new(OverlapResolver::new(
            settings.overlap_min_score,
            normalizer.clone(),
        )));
        Self::new(resolvers)
    }

    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub fn resolve(&self, query: &str, catalog: &CatalogSnapshot) -> Option<Product> {
        if query.is_empty() || catalog.is_empty() {
            return None;
        }
        for resolver in &self.resolvers {
            if let Some(product) = resolver.resolve(query, catalog) {
                tracing::trace!(resolver = resolver.name(), product_id = %product.id, "Product resolved");
                return Some(product);
            }
        }
        None
    }
}

/// Derived data rebuilt whenever the catalog snapshot changes
///
/// Keyed on the generation and the product count, so a provider that
/// swaps the product list without bumping the generation still forces a
/// rebuild when the length differs.
pub(crate) struct GenerationCache<T> {
    slot: RwLock<Option<(CacheKey, Arc<T>)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    generation: u64,
    len: usize,
}

impl CacheKey {
    fn of(catalog: &CatalogSnapshot) -> Self {
        Self {
            generation: catalog.generation,
            len: catalog.len(),
        }
    }
}

impl<T> GenerationCache<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    pub(crate) fn get_or_build(&self, catalog: &CatalogSnapshot, build: impl FnOnce() -> T) -> Arc<T> {
        let key = CacheKey::of(catalog);
        if let Some((cached, value)) = self.slot.read().as_ref() {
            if *cached == key {
                return value.clone();
            }
        }

        let mut slot = self.slot.write();
        if let Some((cached, value)) = slot.as_ref() {
            if *cached == key {
                return value.clone();
            }
        }
        let value = Arc::new(build());
        *slot = Some((key, value.clone()));
        value
    }
}
