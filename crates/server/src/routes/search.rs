use crate::error::ServerResult;
use crate::routes::{with_cache_control, SEARCH_CACHE_CONTROL};
use crate::state::ServerState;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use matcher::{SearchResponse, MIN_QUERY_CHARS};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// `GET /api/search?q=`
///
/// Queries shorter than two characters return an empty list without touching
/// the index. A missing or corrupt index is a 500 (`INDEX_UNAVAILABLE`).
pub async fn search_addresses(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Response> {
    let raw = params.q.unwrap_or_default();
    metrics::counter!("mapsearch_search_requests_total").increment(1);

    if raw.trim().chars().count() < MIN_QUERY_CHARS {
        return Ok(with_cache_control(
            Json(SearchResponse::default()),
            SEARCH_CACHE_CONTROL,
        ));
    }

    let index = state.addresses.get().await?;
    let results = matcher::query(&index, &raw);

    tracing::debug!(
        query_len = raw.chars().count(),
        results = results.len(),
        index_generation = state.addresses.generation(),
        "address search"
    );
    metrics::histogram!("mapsearch_search_results").record(results.len() as f64);

    Ok(with_cache_control(
        Json(SearchResponse { results }),
        SEARCH_CACHE_CONTROL,
    ))
}
