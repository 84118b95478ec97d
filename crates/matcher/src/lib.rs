//! # Address matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` answers autocomplete queries over an in-memory address index.
//! Every entry in the index carries a precomputed normalized form (see
//! [`canonical::normalize`]); a query matches an entry when **every**
//! normalized query token occurs somewhere inside that form.
//!
//! Matching is plain substring containment: tokens are not anchored to word
//! boundaries, so `"paul"` finds `"avenida paulista"`. Results keep index
//! order and are cut at [`MAX_RESULTS`]; there is no relevance scoring.
//!
//! ## Core Types
//!
//! - [`AddressEntry`]: one persisted index row, including `normalized`.
//! - [`SearchResult`]: the client-facing projection without `normalized`.
//! - [`SearchResponse`]: the `{ "results": [...] }` wire envelope.
//! - [`PreparedQuery`]: a parsed query, reusable across many entries.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{query, AddressEntry};
//!
//! let index = vec![
//!     AddressEntry::new("Avenida Paulista", [-23.561, -46.656], "S-01", "Bela Vista", None),
//!     AddressEntry::new("Rua Augusta", [-23.553, -46.651], "S-02", "Consolação", None),
//! ];
//!
//! let hits = query(&index, "av paul");
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].street, "Avenida Paulista");
//!
//! // Fewer than two characters never touches the index.
//! assert!(query(&index, " a ").is_empty());
//! ```
//!
//! ## Observability
//!
//! Install a [`SearchMetrics`] implementation via [`set_search_metrics`] to
//! record per-query latency and hit counts.

pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::engine::{query, PreparedQuery, MAX_RESULTS, MIN_QUERY_CHARS};
pub use crate::metrics::{set_search_metrics, SearchMetrics};
pub use crate::types::{AddressEntry, LatLon, SearchResponse, SearchResult};
