//! Store behaviour against in-memory snapshot sources and a manual clock.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use store::{
    AddressIndexStore, FeatureCollection, FeatureDataStore, LoadFailureKind, ManualClock,
    SnapshotSource, StoreError, ADDRESS_INDEX_TTL, DEFAULT_CENTER, FEATURES_TTL,
};

/// Snapshot source that counts reads and can be swapped or broken mid-test.
struct CountingSource {
    name: &'static str,
    body: Mutex<Option<Vec<u8>>>,
    reads: AtomicUsize,
}

impl CountingSource {
    fn new(name: &'static str, body: Option<serde_json::Value>) -> Arc<Self> {
        Arc::new(Self {
            name,
            body: Mutex::new(body.map(|v| serde_json::to_vec(&v).unwrap())),
            reads: AtomicUsize::new(0),
        })
    }

    fn set(&self, body: Option<serde_json::Value>) {
        *self.body.lock().unwrap() = body.map(|v| serde_json::to_vec(&v).unwrap());
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for CountingSource {
    fn describe(&self) -> String {
        self.name.to_string()
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.body
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such snapshot"))
    }
}

fn address_rows(streets: &[&str]) -> serde_json::Value {
    json!(streets
        .iter()
        .enumerate()
        .map(|(i, s)| json!({
            "logradouro": s,
            "normalized": canonical_like(s),
            "centroid": [-23.5 - i as f64 * 0.01, -46.6],
            "setor": format!("S-{i:02}"),
            "name": "Centro"
        }))
        .collect::<Vec<_>>())
}

fn canonical_like(s: &str) -> String {
    s.to_lowercase()
}

fn feature_snapshot(service: &str) -> serde_json::Value {
    let mut services = serde_json::Map::new();
    services.insert(
        service.to_string(),
        json!([{
            "service": service,
            "setor": "S-01",
            "name": "Praça da República",
            "coords": [[-23.54, -46.64]],
            "centroid": [-23.54, -46.64],
            "fillColor": "#0ea5e9",
            "service_icon": "water",
            "geometry": "point"
        }]),
    );
    json!({
        "services": services,
        "center": [-23.54, -46.64],
        "bounds": { "minLat": -23.6, "maxLat": -23.5, "minLon": -46.7, "maxLon": -46.6 },
        "addressIndex": [
            { "logradouro": "Rua A", "normalized": "rua a", "centroid": [0, 0],
              "setor": "S", "name": "N" }
        ]
    })
}

#[tokio::test]
async fn address_reads_within_ttl_hit_the_source_once() {
    let source = CountingSource::new("addresses", Some(address_rows(&["Rua Augusta"])));
    let clock = Arc::new(ManualClock::new());
    let store = AddressIndexStore::new(source.clone(), clock.clone(), ADDRESS_INDEX_TTL);

    let first = store.get().await.unwrap();
    clock.advance(Duration::from_secs(4 * 60 + 59));
    let second = store.get().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.reads(), 1);
}

#[tokio::test]
async fn address_read_after_ttl_reloads_exactly_once() {
    let source = CountingSource::new("addresses", Some(address_rows(&["Rua Augusta"])));
    let clock = Arc::new(ManualClock::new());
    let store = AddressIndexStore::new(source.clone(), clock.clone(), ADDRESS_INDEX_TTL);

    store.get().await.unwrap();
    source.set(Some(address_rows(&["Rua Augusta", "Rua Oscar Freire"])));
    clock.advance(ADDRESS_INDEX_TTL);

    let reloaded = store.get().await.unwrap();
    let again = store.get().await.unwrap();

    assert_eq!(reloaded.len(), 2);
    assert!(Arc::ptr_eq(&reloaded, &again));
    assert_eq!(source.reads(), 2);
    assert_eq!(store.generation(), 2);
}

#[tokio::test]
async fn address_reload_failure_surfaces_then_recovers() {
    let source = CountingSource::new("addresses", Some(address_rows(&["Rua Augusta"])));
    let clock = Arc::new(ManualClock::new());
    let store = AddressIndexStore::new(source.clone(), clock.clone(), ADDRESS_INDEX_TTL);

    store.get().await.unwrap();
    source.set(None);
    clock.advance(ADDRESS_INDEX_TTL + Duration::from_secs(1));

    let err = store.get().await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::LoadFailure {
            kind: LoadFailureKind::Missing,
            ..
        }
    ));

    source.set(Some(address_rows(&["Rua Augusta", "Rua Bela Cintra"])));
    assert_eq!(store.get().await.unwrap().len(), 2);
}

#[tokio::test]
async fn concurrent_cold_address_readers_trigger_one_read() {
    let source = CountingSource::new("addresses", Some(address_rows(&["Rua Augusta"])));
    let store = Arc::new(AddressIndexStore::new(
        source.clone(),
        Arc::new(ManualClock::new()),
        ADDRESS_INDEX_TTL,
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.get().await.map(|idx| idx.len()) })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 1);
    }
    assert_eq!(source.reads(), 1);
}

#[tokio::test]
async fn features_strip_embedded_address_index() {
    let primary = CountingSource::new("features.json", Some(feature_snapshot("lavagem")));
    let store = FeatureDataStore::new(
        primary.clone(),
        None,
        Arc::new(ManualClock::new()),
        FEATURES_TTL,
    );

    let collection = store.load().await;
    assert_eq!(collection.feature_count(), 1);
    assert!(collection.bounds.is_some());

    let body = serde_json::to_value(collection.as_ref()).unwrap();
    assert!(body.get("addressIndex").is_none());
    assert_eq!(body["services"]["lavagem"][0]["service_icon"], "water");
}

#[tokio::test]
async fn features_keep_unknown_fields_and_skip_only_bad_records() {
    let mut snapshot = feature_snapshot("lavagem");
    snapshot["generatedAt"] = json!("2024-05-01T03:00:00Z");
    let records = snapshot["services"]["lavagem"].as_array_mut().unwrap();
    records[0]["extraField"] = json!("keep me");
    records[0]["volumetria"] = json!(12.5);
    records.push(json!({ "service": "lavagem", "name": 7 }));

    let primary = CountingSource::new("features.json", Some(snapshot));
    let sample = CountingSource::new("features.sample.json", Some(feature_snapshot("amostra")));
    let store = FeatureDataStore::new(
        primary,
        Some(sample.clone() as Arc<dyn SnapshotSource>),
        Arc::new(ManualClock::new()),
        FEATURES_TTL,
    );

    let collection = store.load().await;
    assert_eq!(collection.feature_count(), 1);
    assert_eq!(sample.reads(), 0);

    let body = serde_json::to_value(collection.as_ref()).unwrap();
    assert_eq!(body["generatedAt"], "2024-05-01T03:00:00Z");
    assert!(body.get("addressIndex").is_none());
    let served = &body["services"]["lavagem"][0];
    assert_eq!(served["extraField"], "keep me");
    assert_eq!(served["volumetria"], 12.5);
    assert!(served.get("turno").is_none());
    assert!(served.get("popupHtml").is_none());
}

#[tokio::test]
async fn features_fall_back_to_sample() {
    let primary = CountingSource::new("features.json", None);
    let sample = CountingSource::new("features.sample.json", Some(feature_snapshot("amostra")));
    let store = FeatureDataStore::new(
        primary.clone(),
        Some(sample.clone() as Arc<dyn SnapshotSource>),
        Arc::new(ManualClock::new()),
        FEATURES_TTL,
    );

    let collection = store.load().await;
    assert!(collection.services.contains_key("amostra"));
    assert_eq!(primary.reads(), 1);
    assert_eq!(sample.reads(), 1);
}

#[tokio::test]
async fn features_without_any_source_are_empty_but_valid() {
    let primary = CountingSource::new("features.json", None);
    let sample = CountingSource::new("features.sample.json", None);
    let store = FeatureDataStore::new(
        primary,
        Some(sample as Arc<dyn SnapshotSource>),
        Arc::new(ManualClock::new()),
        FEATURES_TTL,
    );

    let collection = store.load().await;
    assert_eq!(*collection, FeatureCollection::empty());
    assert!(collection.services.is_empty());
    assert_eq!(collection.center, DEFAULT_CENTER);
    assert!(collection.bounds.is_none());
}

#[tokio::test]
async fn malformed_primary_falls_back() {
    let primary = CountingSource::new("features.json", Some(json!({ "services": 42 })));
    let sample = CountingSource::new("features.sample.json", Some(feature_snapshot("amostra")));
    let store = FeatureDataStore::new(
        primary,
        Some(sample as Arc<dyn SnapshotSource>),
        Arc::new(ManualClock::new()),
        FEATURES_TTL,
    );
    assert!(store.load().await.services.contains_key("amostra"));
}

#[tokio::test]
async fn features_are_cached_for_their_ttl() {
    let primary = CountingSource::new("features.json", Some(feature_snapshot("lavagem")));
    let clock = Arc::new(ManualClock::new());
    let store = FeatureDataStore::new(primary.clone(), None, clock.clone(), FEATURES_TTL);

    store.load().await;
    clock.advance(FEATURES_TTL - Duration::from_secs(1));
    store.load().await;
    assert_eq!(primary.reads(), 1);

    clock.advance(Duration::from_secs(1));
    store.load().await;
    assert_eq!(primary.reads(), 2);
}
