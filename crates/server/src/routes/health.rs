use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "map-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// Ready once the address index can be served. The feature collection always
/// has a fallback, so it never blocks readiness.
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let index = state.addresses.get().await;
    let features_loaded = state.features.is_loaded();

    let (status, overall, index_status) = match &index {
        Ok(_) => (StatusCode::OK, "ready", "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not_ready", "unavailable"),
    };
    let entries = index.as_ref().map(|i| i.len()).unwrap_or(0);
    let error = index.as_ref().err().map(|e| e.to_string());
    let features_status = if features_loaded { "loaded" } else { "lazy" };

    let body = Json(json!({
        "status": overall,
        "service": "map-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "components": {
            "api": "ready",
            "address_index": {
                "status": index_status,
                "entries": entries,
                "generation": state.addresses.generation(),
                "source": state.addresses.source(),
                "error": error,
            },
            "features": {
                "status": features_status,
                "generation": state.features.generation(),
            },
        }
    }));

    (status, body)
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let handle = state.metrics.as_ref().ok_or(ServerError::NotFound)?;
    Ok((
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
