//! HTTP boundary for the shop dialog engine
//!
//! Wraps `DialogEngine` in an axum router and serves the product
//! catalog from a JSON file.
//!
//! # Example
//!
//! ```ignore
//! let state = AppState::new(engine, catalog);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router(state)).await?;
//! ```

pub mod catalog;
pub mod error;
pub mod http;
pub mod state;
pub mod telemetry;

pub use catalog::JsonFileCatalog;
pub use error::ApiError;
pub use state::AppState;

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Request body ceiling for `/api/chat`
const MAX_BODY_BYTES: usize = 16 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(http::handle_chat))
        .route("/api/products", get(http::handle_products))
        .route("/health", get(http::handle_health))
        .route("/metrics", get(http::handle_metrics))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(tower_http::timeout::TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
