//! API route handlers
//!
//! - `search`: address autocomplete over the cached index
//! - `features`: the map's feature collection
//! - `health`: liveness, readiness and Prometheus metrics

pub mod features;
pub mod health;
pub mod search;

use crate::error::{ServerError, ServerResult};
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// CDN policy for successful search responses.
pub const SEARCH_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=300";

/// CDN policy for the feature collection.
pub const FEATURES_CACHE_CONTROL: &str = "public, s-maxage=600, stale-while-revalidate=300";

pub(crate) fn with_cache_control(body: impl IntoResponse, policy: &'static str) -> Response {
    ([(CACHE_CONTROL, HeaderValue::from_static(policy))], body).into_response()
}

/// API version and base info
///
/// # Response
///
/// ```json
/// {
///   "name": "Map Search Server",
///   "version": "0.1.0",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Map Search Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/search?q=",
            "/api/features",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
