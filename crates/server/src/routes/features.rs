use crate::routes::{with_cache_control, FEATURES_CACHE_CONTROL};
use crate::state::ServerState;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use std::sync::Arc;

/// `GET /api/features`
///
/// Always succeeds; with no snapshot on disk the body is an empty collection
/// centred on the default map centre.
pub async fn feature_collection(State(state): State<Arc<ServerState>>) -> Response {
    let collection = state.features.load().await;
    metrics::gauge!("mapsearch_features_loaded").set(collection.feature_count() as f64);
    with_cache_control(Json(collection.as_ref()), FEATURES_CACHE_CONTROL)
}
