//! `shopbot` server binary
//!
//! Usage: `shopbot [settings.yaml]`. Without an argument settings come
//! from `config/shopbot.*` if present, then `SHOPBOT__*` variables.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use shopbot_agent::DialogEngine;
use shopbot_config::{DomainData, EngineSettings};
use shopbot_server::telemetry::{init_tracing, install_metrics};
use shopbot_server::{router, AppState, JsonFileCatalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = EngineSettings::load(settings_path.as_deref()).context("loading settings")?;
    init_tracing(&settings.log);

    let metrics = install_metrics().context("installing metrics recorder")?;

    let domain = DomainData::load(settings.server.data_dir.as_ref()).context("loading domain data")?;
    let catalog = Arc::new(
        JsonFileCatalog::load(&settings.server.catalog_path).context("loading catalog")?,
    );
    let _refresh = (settings.server.catalog_refresh_secs > 0).then(|| {
        catalog
            .clone()
            .spawn_refresh(Duration::from_secs(settings.server.catalog_refresh_secs))
    });

    let engine = DialogEngine::new(&domain, &settings, catalog.clone());
    tracing::info!(
        products = catalog.current().len(),
        "Dialog engine ready"
    );

    let state = AppState::new(Arc::new(engine), catalog).with_metrics(metrics);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl-c");
    }
}
