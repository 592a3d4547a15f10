//! Product catalog collaborator
//!
//! The dialog engine only ever reads the catalog. Providers hand out
//! immutable snapshots; a refresh produces a new snapshot with a higher
//! generation so derived indexes know when to rebuild.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog product record
///
/// Every field except `id` and `name` may be missing in upstream data;
/// consumers treat absent numbers as zero or render them as "contact us".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_avg: Option<f32>,
}

impl Product {
    /// Minimal product, mostly useful for fixtures
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: None,
            category_id: None,
            price: None,
            image: None,
            stock: None,
            sold: None,
            rating_avg: None,
        }
    }

    pub fn brand_or_empty(&self) -> &str {
        self.brand.as_deref().unwrap_or("")
    }

    pub fn category_or_empty(&self) -> &str {
        self.category_id.as_deref().unwrap_or("")
    }

    pub fn sold_or_zero(&self) -> u64 {
        self.sold.unwrap_or(0)
    }

    pub fn rating_or_zero(&self) -> f32 {
        self.rating_avg.unwrap_or(0.0)
    }
}

/// Immutable view of the catalog at one point in time
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Bumped on every refresh
    pub generation: u64,
    pub products: Vec<Product>,
}

impl CatalogSnapshot {
    pub fn new(generation: u64, products: Vec<Product>) -> Self {
        Self { generation, products }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Products sorted by descending `sold`, ties kept in catalog order
    pub fn best_sellers(&self, count: usize) -> Vec<Product> {
        let mut ranked: Vec<&Product> = self.products.iter().collect();
        // sort_by is stable, so equal sales keep their catalog order
        ranked.sort_by(|a, b| b.sold_or_zero().cmp(&a.sold_or_zero()));
        ranked.into_iter().take(count).cloned().collect()
    }

    /// Products whose category id equals `category_id`, in catalog order
    pub fn in_category(&self, category_id: &str) -> impl Iterator<Item = &Product> {
        let category_id = category_id.to_string();
        self.products
            .iter()
            .filter(move |p| p.category_id.as_deref() == Some(category_id.as_str()))
    }
}

/// Errors raised by catalog providers
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog source unavailable: {0}")]
    Unavailable(String),

    #[error("Catalog data malformed: {0}")]
    Malformed(String),
}

/// Read-only product catalog collaborator
///
/// A snapshot whose products differ from the previous one must carry a
/// new `generation`; derived indexes rebuild when the generation or the
/// product count changes.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Current catalog snapshot
    async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError>;
}

/// In-memory catalog, replaceable at runtime
pub struct StaticCatalog {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::new(1, products))),
        }
    }

    /// Swap in a new product list, bumping the generation
    pub fn replace(&self, products: Vec<Product>) {
        let mut current = self.current.write();
        let generation = current.generation + 1;
        *current = Arc::new(CatalogSnapshot::new(generation, products));
        tracing::debug!(generation, "Catalog snapshot replaced");
    }

    pub fn current(&self) -> Arc<CatalogSnapshot> {
        self.current.read().clone()
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        Ok(self.current())
    }
}
