//! Where suggestions and geocoded places come from.

use async_trait::async_trait;
use matcher::{LatLon, SearchResponse, SearchResult};
use serde::Deserialize;
use store::FeatureCollection;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

const USER_AGENT: &str = concat!("mapsearch/", env!("CARGO_PKG_VERSION"));

/// Local address autocomplete.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn search(&self, query: &str) -> ClientResult<Vec<SearchResult>>;
}

/// Free-text geocoding used when the local index has nothing.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the geocoder found nothing.
    async fn geocode(&self, query: &str) -> ClientResult<Option<GeocodedPlace>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub position: LatLon,
    pub label: String,
}

/// Talks to the map server's `/api/search` and `/api/features`.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSearchClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.search_timeout())
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the full feature collection for drawing.
    pub async fn features(&self) -> ClientResult<FeatureCollection> {
        let response = self
            .http
            .get(format!("{}/api/features", self.base_url))
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SuggestionSource for HttpSearchClient {
    async fn search(&self, query: &str) -> ClientResult<Vec<SearchResult>> {
        let response = self
            .http
            .get(format!("{}/api/search", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?;
        let body: SearchResponse = check_status(response)?.json().await?;
        Ok(body.results)
    }
}

/// Nominatim-compatible geocoder.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: reqwest::Client,
    url: String,
    accept_language: String,
}

impl NominatimGeocoder {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.geocode_timeout())
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self {
            http,
            url: config.geocoder_url.clone(),
            accept_language: config.accept_language.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> ClientResult<Option<GeocodedPlace>> {
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", "1"),
                ("addressdetails", "0"),
            ])
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;
        let hits: Vec<NominatimHit> = check_status(response)?.json().await?;
        place_from_hits(hits, query)
    }
}

/// One Nominatim result. Coordinates arrive as decimal strings.
#[derive(Debug, Deserialize)]
pub struct NominatimHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// First usable place from a Nominatim response.
pub fn place_from_hits(hits: Vec<NominatimHit>, query: &str) -> ClientResult<Option<GeocodedPlace>> {
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let lat = parse_coordinate(&hit.lat, 90.0)?;
    let lon = parse_coordinate(&hit.lon, 180.0)?;
    let label = hit
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| query.to_string());

    Ok(Some(GeocodedPlace {
        position: [lat, lon],
        label,
    }))
}

fn parse_coordinate(raw: &str, limit: f64) -> ClientResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
        .ok_or(ClientError::InvalidCoordinates)
}

fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status(status.as_u16()))
    }
}
