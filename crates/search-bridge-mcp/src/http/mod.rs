//! HTTP front end serving `GET /search` and `/health`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use search_bridge::{SearchBridge, SearchRecord};

use crate::types::{McpError, McpResult};

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub bridge: SearchBridge,
}

/// Query-string pairs in request order. Repeated keys are kept, so
/// `?q=a&q=b` is accepted and the first `q` wins.
#[derive(Debug, Default)]
pub struct SearchParams(pub Vec<(String, String)>);

impl SearchParams {
    pub fn query(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.as_str())
    }
}

/// Failures that escape the bridge. Rendered as `500 {"error": ...}`.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("search panicked: {0}")]
    Panicked(String),

    #[error("search task cancelled")]
    Cancelled,
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        if !e.is_panic() {
            return ApiError::Cancelled;
        }

        let payload = e.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        ApiError::Panicked(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Search request failed: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            AxumJson(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Build the router for a bridge.
pub fn router(bridge: SearchBridge) -> Router {
    let state = Arc::new(ServerState { bridge });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", get(handle_search))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until the process ends.
pub async fn serve(addr: &str, bridge: SearchBridge) -> McpResult<()> {
    let app = router(bridge);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(McpError::Io)?;

    tracing::info!("Search bridge running on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| McpError::Transport(e.to_string()))?;

    Ok(())
}

async fn handle_search(
    State(state): State<Arc<ServerState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<AxumJson<Vec<SearchRecord>>, ApiError> {
    let query = SearchParams(pairs).query().unwrap_or_default().to_string();
    tracing::info!("Request for: {query}");

    if query.trim().is_empty() {
        return Ok(AxumJson(Vec::new()));
    }

    // A panicking provider must not take the connection down with it.
    let bridge = state.bridge.clone();
    let outcome = tokio::spawn(async move { bridge.search_traced(&query).await }).await?;

    tracing::info!(
        "Answered with {} results from the {} tier",
        outcome.records.len(),
        outcome.tier
    );
    Ok(AxumJson(outcome.records))
}

/// Health check endpoint.
async fn handle_health() -> AxumJson<serde_json::Value> {
    AxumJson(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
