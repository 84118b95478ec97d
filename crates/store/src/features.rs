//! Feature collection snapshot and its store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use matcher::LatLon;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cache::{record_load, TtlCache};
use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};
use crate::icons::{resolve_icon, IconResolution};
use crate::source::{FileSource, SnapshotSource};

/// Map centre used when no snapshot is available (São Paulo).
pub const DEFAULT_CENTER: LatLon = [-23.55052, -46.633308];

/// How long a loaded feature collection is served before it is re-read.
pub const FEATURES_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    Polygon,
    Line,
    Point,
}

/// One drawable service area, route or point.
///
/// Only the fields the map logic reads are typed. Every other field of the
/// snapshot record lands in `extra` and is served back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub service: String,
    #[serde(rename = "setor")]
    pub sector: String,
    pub name: String,
    #[serde(default)]
    pub coords: Vec<LatLon>,
    pub centroid: LatLon,
    #[serde(rename = "fillColor")]
    pub fill_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(rename = "popupHtml", default, skip_serializing_if = "Option::is_none")]
    pub popup_html: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureRecord {
    /// Icon for this feature: `service_icon`, then `service_type_code`, then
    /// `service_type`, else the default icon.
    pub fn icon(&self) -> IconResolution {
        let raw = self
            .service_icon
            .as_deref()
            .or(self.service_type_code.as_deref())
            .or(self.service_type.as_deref());
        resolve_icon(raw)
    }

    /// Declared geometry, polygon when the record does not say.
    pub fn geometry_kind(&self) -> Geometry {
        self.geometry.unwrap_or(Geometry::Polygon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(rename = "minLat")]
    pub min_lat: f64,
    #[serde(rename = "maxLat")]
    pub max_lat: f64,
    #[serde(rename = "minLon")]
    pub min_lon: f64,
    #[serde(rename = "maxLon")]
    pub max_lon: f64,
}

/// Everything the map draws, keyed by service.
///
/// Never carries address index data; that is served by
/// [`crate::AddressIndexStore`] only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub services: BTreeMap<String, Vec<FeatureRecord>>,
    pub center: LatLon,
    #[serde(default)]
    pub bounds: Option<Bounds>,
    /// Top-level snapshot fields other than `addressIndex`, passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    /// Structurally valid collection with nothing in it.
    pub fn empty() -> Self {
        Self {
            services: BTreeMap::new(),
            center: DEFAULT_CENTER,
            bounds: None,
            extra: Map::new(),
        }
    }

    pub fn feature_count(&self) -> usize {
        self.services.values().map(Vec::len).sum()
    }

    /// Icon keys present in the data that the registry does not know.
    pub fn unrecognized_icons(&self) -> BTreeSet<String> {
        self.services
            .values()
            .flatten()
            .filter_map(|f| match f.icon() {
                IconResolution::Unrecognized(raw) => Some(raw),
                _ => None,
            })
            .collect()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::empty()
    }
}

/// On-disk shape, which may still embed the address index.
///
/// Records stay raw here so one bad record is skipped on its own instead of
/// failing the whole snapshot.
#[derive(Deserialize)]
struct FeatureSnapshot {
    services: BTreeMap<String, Vec<Value>>,
    #[serde(default = "default_center")]
    center: LatLon,
    #[serde(default)]
    bounds: Option<Bounds>,
    #[serde(rename = "addressIndex", default)]
    address_index: Option<IgnoredAny>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn default_center() -> LatLon {
    DEFAULT_CENTER
}

/// Serves the feature collection from a [`TtlCache`].
///
/// Loading never fails: the primary snapshot is tried first, then the bundled
/// sample, then [`FeatureCollection::empty`].
pub struct FeatureDataStore {
    primary: Arc<dyn SnapshotSource>,
    sample: Option<Arc<dyn SnapshotSource>>,
    cache: TtlCache<FeatureCollection>,
}

impl FeatureDataStore {
    pub fn new(
        primary: Arc<dyn SnapshotSource>,
        sample: Option<Arc<dyn SnapshotSource>>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            primary,
            sample,
            cache: TtlCache::new(ttl, clock),
        }
    }

    /// File-backed store with the system clock and [`FEATURES_TTL`].
    pub fn from_paths(
        primary: impl Into<std::path::PathBuf>,
        sample: Option<std::path::PathBuf>,
    ) -> Self {
        Self::new(
            Arc::new(FileSource::new(primary)),
            sample.map(|p| Arc::new(FileSource::new(p)) as Arc<dyn SnapshotSource>),
            Arc::new(SystemClock),
            FEATURES_TTL,
        )
    }

    pub async fn load(&self) -> Arc<FeatureCollection> {
        self.cache
            .get_or_refresh(|| async move {
                Ok::<_, std::convert::Infallible>(self.load_uncached().await)
            })
            .await
            .unwrap_or_else(|never| match never {})
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.peek().is_some()
    }

    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    async fn load_uncached(&self) -> FeatureCollection {
        let started = Instant::now();
        let sources = std::iter::once(&self.primary).chain(self.sample.iter());

        for source in sources {
            match read_collection(source.as_ref()).await {
                Ok(collection) => {
                    let unknown = collection.unrecognized_icons();
                    if !unknown.is_empty() {
                        tracing::warn!(
                            source = %source.describe(),
                            keys = ?unknown,
                            "features reference unknown icon keys, drawing default icon"
                        );
                    }
                    tracing::info!(
                        source = %source.describe(),
                        services = collection.services.len(),
                        features = collection.feature_count(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "feature collection loaded"
                    );
                    record_load("features", Ok(collection.feature_count()));
                    return collection;
                }
                Err(err) => {
                    record_load("features", Err(()));
                    tracing::warn!(error = %err, "feature snapshot unavailable, trying next source");
                }
            }
        }

        tracing::warn!("no feature snapshot available, serving empty collection");
        record_load("features", Ok(0));
        FeatureCollection::empty()
    }
}

async fn read_collection(source: &dyn SnapshotSource) -> StoreResult<FeatureCollection> {
    let origin = source.describe();
    let bytes = source
        .read()
        .await
        .map_err(|e| StoreError::io(origin.clone(), &e))?;

    let parse_origin = origin.clone();
    let snapshot = tokio::task::spawn_blocking(move || {
        serde_json::from_slice::<FeatureSnapshot>(&bytes)
            .map_err(|e| StoreError::malformed(parse_origin, e))
    })
    .await
    .map_err(|e| StoreError::malformed(origin.clone(), format!("parse task aborted: {e}")))??;

    if snapshot.address_index.is_some() {
        tracing::debug!(source = %origin, "dropped embedded address index from feature snapshot");
    }

    let mut services = BTreeMap::new();
    for (service, raw_records) in snapshot.services {
        let mut records = Vec::with_capacity(raw_records.len());
        for (position, raw) in raw_records.into_iter().enumerate() {
            match serde_json::from_value::<FeatureRecord>(raw) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!(
                    source = %origin,
                    service = %service,
                    position,
                    error = %err,
                    "skipping malformed feature record"
                ),
            }
        }
        services.insert(service, records);
    }

    Ok(FeatureCollection {
        services,
        center: snapshot.center,
        bounds: snapshot.bounds,
        extra: snapshot.extra,
    })
}
