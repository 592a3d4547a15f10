//! JSON-file catalog provider
//!
//! Reads a JSON array of products. A refresh that fails (missing file,
//! bad JSON) keeps serving the previous snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use shopbot_core::{CatalogError, CatalogProvider, CatalogSnapshot, Product};
use tokio::task::JoinHandle;

pub struct JsonFileCatalog {
    path: PathBuf,
    current: RwLock<Arc<CatalogSnapshot>>,
}

fn parse(path: &Path, raw: &str) -> Result<Vec<Product>, CatalogError> {
    serde_json::from_str(raw)
        .map_err(|e| CatalogError::Malformed(format!("{}: {}", path.display(), e)))
}

impl JsonFileCatalog {
    /// Load the file once; fails if it cannot be read or parsed
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| CatalogError::Unavailable(format!("{}: {}", path.display(), e)))?;
        let products = parse(&path, &raw)?;

        tracing::info!(path = %path.display(), products = products.len(), "Catalog loaded");
        Ok(Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::new(1, products))),
            path,
        })
    }

    pub fn current(&self) -> Arc<CatalogSnapshot> {
        self.current.read().clone()
    }

    /// Re-read the file; returns the new generation
    pub async fn reload(&self) -> Result<u64, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CatalogError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        let products = parse(&self.path, &raw)?;

        let mut current = self.current.write();
        if current.products == products {
            return Ok(current.generation);
        }
        let generation = current.generation + 1;
        *current = Arc::new(CatalogSnapshot::new(generation, products));
        tracing::info!(generation, products = current.len(), "Catalog refreshed");
        Ok(generation)
    }

    /// Reload on a fixed interval until the task is aborted
    pub fn spawn_refresh(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = self.reload().await {
                    tracing::warn!(error = %e, "Catalog refresh failed, keeping previous snapshot");
                }
            }
        })
    }
}

#[async_trait]
impl CatalogProvider for JsonFileCatalog {
    async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(file: &tempfile::NamedTempFile, body: &str) {
        std::fs::write(file.path(), body).unwrap();
    }

    #[test]
    fn test_load_reads_products() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write(&file, r#"[{"id":"p1","name":"Áo thun","price":149000}]"#);

        let catalog = JsonFileCatalog::load(file.path()).unwrap();
        let snapshot = catalog.current();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.products[0].price, Some(149_000));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write(&file, "{not json");
        assert!(matches!(
            JsonFileCatalog::load(file.path()),
            Err(CatalogError::Malformed(_))
        ));
        assert!(matches!(
            JsonFileCatalog::load("/definitely/missing.json"),
            Err(CatalogError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_reload_bumps_generation_and_keeps_old_on_failure() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write(&file, r#"[{"id":"p1","name":"A"}]"#);
        let catalog = JsonFileCatalog::load(file.path()).unwrap();

        // unchanged content keeps the generation
        assert_eq!(catalog.reload().await.unwrap(), 1);

        write(&file, r#"[{"id":"p1","name":"A"},{"id":"p2","name":"B"}]"#);
        assert_eq!(catalog.reload().await.unwrap(), 2);
        assert_eq!(catalog.snapshot().await.unwrap().len(), 2);

        write(&file, "[broken");
        assert!(catalog.reload().await.is_err());
        let snapshot = catalog.snapshot().await.unwrap();
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.len(), 2);
    }
}
