//! In-process suggestion source.

use std::sync::Arc;

use async_trait::async_trait;
use client::{ClientError, ClientResult, SuggestionSource};
use matcher::SearchResult;
use store::AddressIndexStore;

/// Serves suggestions straight from an [`AddressIndexStore`], for hosts
/// that embed the index instead of calling the HTTP endpoint.
#[derive(Clone)]
pub struct IndexSuggestionSource {
    store: Arc<AddressIndexStore>,
}

impl IndexSuggestionSource {
    pub fn new(store: Arc<AddressIndexStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SuggestionSource for IndexSuggestionSource {
    async fn search(&self, query: &str) -> ClientResult<Vec<SearchResult>> {
        if query.trim().chars().count() < matcher::MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }
        let index = self
            .store
            .get()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(matcher::query(&index, query))
    }
}
