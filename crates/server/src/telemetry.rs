//! Logging and metrics setup

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use shopbot_config::{LogFormat, LogSettings};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; `RUST_LOG` wins over the configured level
pub fn init_tracing(settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", settings.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    // a subscriber may already be set (tests, embedding)
    let _ = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

pub fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!("shopbot_turns_total", "Answered turns by decision branch");
    metrics::describe_counter!("shopbot_sensitive_hits_total", "Turns refused by the sensitive filter");
    metrics::describe_counter!("shopbot_faq_hits_total", "Turns answered from the FAQ");
    metrics::describe_counter!("shopbot_catalog_errors_total", "Catalog snapshot failures");
    Ok(handle)
}
