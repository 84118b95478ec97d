//! Address search for a service-area map.
//!
//! The workspace is split by concern and this crate re-exports the pieces:
//!
//! - [`canonical`]: text normalization shared by the index and queries
//! - [`matcher`]: multi-token substring search over the address index
//! - [`store`]: TTL-cached snapshot stores for the address index and the
//!   feature collection
//! - [`client`]: the debounced search box state machine and its runner
//! - `server` (feature `server`): the axum HTTP API
//!
//! ```no_run
//! use std::sync::Arc;
//! use mapsearch::{AddressIndexStore, IndexSuggestionSource, SuggestionSource};
//!
//! # async fn demo() -> Result<(), mapsearch::ClientError> {
//! let store = Arc::new(AddressIndexStore::from_path("data/addressIndex.json"));
//! let source = IndexSuggestionSource::new(store);
//! for result in source.search("av paulista").await? {
//!     println!("{} {:?}", result.label(), result.centroid);
//! }
//! # Ok(())
//! # }
//! ```

mod local;

pub use crate::local::IndexSuggestionSource;

pub use canonical::{normalize, query_tokens, tokens};
pub use client::{
    transition, ClientConfig, ClientError, ClientResult, Destination, Event, GeocodedPlace,
    Geocoder, HttpSearchClient, Intent, MapNavigator, MarkerHandle, MarkerIcon, NavKey,
    NominatimGeocoder, Phase, RecordingNavigator, SearchController, SearchState,
    SuggestionSource,
};
pub use matcher::{
    query, set_search_metrics, AddressEntry, LatLon, SearchMetrics, SearchResponse, SearchResult,
    MAX_RESULTS, MIN_QUERY_CHARS,
};
pub use store::{
    AddressIndexStore, Clock, FeatureCollection, FeatureDataStore, FeatureRecord, FileSource,
    IconResolution, LoadFailureKind, ManualClock, ServiceIconKey, SnapshotSource, StoreError,
    SystemClock, TtlCache, DEFAULT_CENTER,
};

#[cfg(feature = "server")]
pub use server::{build_router, start_server, ServerConfig, ServerError, ServerState};
