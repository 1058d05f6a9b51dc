// handlers/system.rs - service metadata and liveness routes

use axum::extract::State;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// GET / - service name, version and endpoint map
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Uptask API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "GraphQL backend for projects and tasks with per-user isolation",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "graphql": "/graphql (POST queries and mutations; GET serves GraphiQL when enabled)",
        }
    }))
}

/// GET /health - 200 when the store answers, 503 otherwise
///
/// Expected Output:
/// ```json
/// { "success": true, "data": { "status": "ok", "timestamp": "...", "database": "ok" } }
/// ```
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    if let Err(e) = state.store.health_check().await {
        tracing::error!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("database unavailable"));
    }

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
