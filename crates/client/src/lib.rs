//! Address search client.
//!
//! The search box is modelled as a pure state machine ([`machine`]) whose
//! [`transition`] function returns the next [`SearchState`] and a list of
//! [`Intent`]s. [`SearchController`] performs those intents: it debounces
//! typing, queries a [`SuggestionSource`] with a timeout, falls back to a
//! [`Geocoder`] when the local index has nothing, and moves a
//! [`MapNavigator`] to the chosen place.
//!
//! ```no_run
//! use std::sync::Arc;
//! use client::{
//!     ClientConfig, HttpSearchClient, NominatimGeocoder, RecordingNavigator, SearchController,
//! };
//!
//! # async fn demo() -> Result<(), client::ClientError> {
//! let config = ClientConfig::default().with_base_url("http://localhost:3000");
//! let api = Arc::new(HttpSearchClient::new(&config)?);
//! let geocoder = Arc::new(NominatimGeocoder::new(&config)?);
//!
//! let mut search = SearchController::new(config, api, geocoder, RecordingNavigator::new());
//! search.input("avenida paulista");
//! search.settle().await;
//! for suggestion in &search.state().suggestions {
//!     println!("{}", suggestion.label());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod machine;
pub mod navigator;
pub mod sources;

pub use crate::config::ClientConfig;
pub use crate::controller::SearchController;
pub use crate::error::{ClientError, ClientResult};
pub use crate::machine::{
    transition, Destination, Event, Intent, NavKey, Phase, SearchState,
    INVALID_COORDINATES_MESSAGE, NOT_FOUND_MESSAGE, UNAVAILABLE_MESSAGE,
};
pub use crate::navigator::{
    MapNavigator, MarkerHandle, MarkerIcon, NavigatorCall, RecordingNavigator,
};
pub use crate::sources::{
    place_from_hits, GeocodedPlace, Geocoder, HttpSearchClient, NominatimGeocoder, NominatimHit,
    SuggestionSource,
};
