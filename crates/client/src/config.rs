use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Search client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL of the map server, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Quiet period after the last keystroke before searching
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Upper bound on one local search request
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,

    /// Upper bound on one geocoder request
    #[serde(default = "default_geocode_timeout_ms")]
    pub geocode_timeout_ms: u64,

    /// External geocoder search endpoint
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    /// Accept-Language sent to the geocoder
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Zoom level after selecting an address
    #[serde(default = "default_select_zoom")]
    pub select_zoom: u8,

    /// Zoom level when the map is first centred
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,

    /// Fly-to animation length in seconds
    #[serde(default = "default_fly_duration_secs")]
    pub fly_duration_secs: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            debounce_ms: default_debounce_ms(),
            search_timeout_ms: default_search_timeout_ms(),
            geocode_timeout_ms: default_geocode_timeout_ms(),
            geocoder_url: default_geocoder_url(),
            accept_language: default_accept_language(),
            select_zoom: default_select_zoom(),
            initial_zoom: default_initial_zoom(),
            fly_duration_secs: default_fly_duration_secs(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_millis(self.geocode_timeout_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_search_timeout_ms() -> u64 {
    5_000
}

fn default_geocode_timeout_ms() -> u64 {
    10_000
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_accept_language() -> String {
    "pt-BR".to_string()
}

fn default_select_zoom() -> u8 {
    18
}

fn default_initial_zoom() -> u8 {
    13
}

fn default_fly_duration_secs() -> f64 {
    0.75
}
