use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use shopbot_agent::DialogEngine;
use shopbot_core::CatalogProvider;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DialogEngine>,
    pub catalog: Arc<dyn CatalogProvider>,
    /// Absent when no recorder is installed (tests)
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(engine: Arc<DialogEngine>, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            engine,
            catalog,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
