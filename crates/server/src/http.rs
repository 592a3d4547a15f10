//! Route handlers
//!
//! - `POST /api/chat`: one dialog turn
//! - `GET /api/products`: the current catalog
//! - `GET /health`, `GET /metrics`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shopbot_core::{BotResponse, Product};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub ok: bool,
    pub reply: BotResponse,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub ok: bool,
    pub items: Vec<Product>,
}

pub async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable chat body");
            ChatRequest::default()
        }
    };

    let message = match request.message.as_deref() {
        Some(m) if !m.trim().is_empty() => m,
        _ => return Err(ApiError::MessageRequired),
    };

    let outcome = state
        .engine
        .handle_turn(message, request.user_id.as_deref())
        .await;
    tracing::debug!(user_id = %outcome.user_id, branch = outcome.branch.as_str(), "Chat turn");

    Ok(Json(ChatResponse {
        ok: true,
        reply: outcome.reply,
        user_id: outcome.user_id,
    }))
}

pub async fn handle_products(
    State(state): State<AppState>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let snapshot = state.catalog.snapshot().await?;
    Ok(Json(ProductsResponse {
        ok: true,
        items: snapshot.products.clone(),
    }))
}

pub async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn handle_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use shopbot_agent::DialogEngine;
    use shopbot_config::{DomainData, EngineSettings};
    use shopbot_core::StaticCatalog;
    use tower::ServiceExt;

    use super::*;
    use crate::router;

    fn app() -> axum::Router {
        let mut shirt = Product::new("p001", "Áo thun basic trắng");
        shirt.price = Some(149_000);
        shirt.sold = Some(120);
        let catalog = Arc::new(StaticCatalog::new(vec![shirt]));

        let domain = DomainData::embedded().unwrap();
        let engine = DialogEngine::new(&domain, &EngineSettings::default(), catalog.clone());
        router(AppState::new(Arc::new(engine), catalog))
    }

    fn chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_requires_message() {
        for body in [r#"{"message":""}"#, r#"{"message":"   "}"#, r#"{}"#, "not json"] {
            let response = app().oneshot(chat(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
            let json = read_json(response).await;
            assert_eq!(json["ok"], false);
            assert_eq!(json["error"], "message required");
        }
    }

    #[tokio::test]
    async fn test_chat_answers_and_echoes_user() {
        let response = app()
            .oneshot(chat(r#"{"message":"xin chào","userId":"u-42"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["userId"], "u-42");
        assert!(json["reply"]["type"].is_string());
    }

    #[tokio::test]
    async fn test_chat_generates_user_id() {
        let response = app().oneshot(chat(r#"{"message":"áo thun"}"#)).await.unwrap();
        let json = read_json(response).await;
        assert!(json["userId"].as_str().unwrap().starts_with("user_"));
    }

    #[tokio::test]
    async fn test_products_lists_catalog() {
        let request = Request::builder()
            .uri("/api/products")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["items"][0]["id"], "p001");
        assert_eq!(json["items"][0]["price"], 149000);
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let health = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let json = read_json(app().oneshot(health).await.unwrap()).await;
        assert_eq!(json["status"], "ok");

        let metrics = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let response = app().oneshot(metrics).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
