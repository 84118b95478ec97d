//! Address index snapshot store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use matcher::AddressEntry;

use crate::cache::{record_load, TtlCache};
use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};
use crate::source::{FileSource, SnapshotSource};

/// How long a loaded address index is served before it is re-read.
pub const ADDRESS_INDEX_TTL: Duration = Duration::from_secs(5 * 60);

/// Serves the address index from a [`TtlCache`], reloading it from its
/// [`SnapshotSource`] when the TTL expires.
///
/// One instance per server process. Refresh is single-flight: concurrent
/// callers in a stale window trigger one reload, and those that already had
/// a snapshot keep getting it until the reload lands.
pub struct AddressIndexStore {
    source: Arc<dyn SnapshotSource>,
    cache: TtlCache<Vec<AddressEntry>>,
}

impl AddressIndexStore {
    pub fn new(source: Arc<dyn SnapshotSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl, clock),
        }
    }

    /// File-backed store with the system clock and [`ADDRESS_INDEX_TTL`].
    pub fn from_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(
            Arc::new(FileSource::new(path)),
            Arc::new(SystemClock),
            ADDRESS_INDEX_TTL,
        )
    }

    /// Returns the current address index, reloading it if stale.
    ///
    /// Fails with [`StoreError::LoadFailure`] when no usable snapshot can be
    /// produced. A previously loaded index is kept for the next attempt.
    pub async fn get(&self) -> StoreResult<Arc<Vec<AddressEntry>>> {
        self.cache
            .get_or_refresh(|| async {
                let loaded = load_index(self.source.as_ref()).await;
                record_load("address", loaded.as_ref().map(Vec::len).map_err(|_| ()));
                loaded
            })
            .await
    }

    /// Whether an index has been loaded at least once.
    pub fn is_loaded(&self) -> bool {
        self.cache.peek().is_some()
    }

    /// Number of successful loads since startup.
    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    pub fn source(&self) -> String {
        self.source.describe()
    }
}

async fn load_index(source: &dyn SnapshotSource) -> StoreResult<Vec<AddressEntry>> {
    let origin = source.describe();
    let started = Instant::now();

    let bytes = source.read().await.map_err(|e| {
        let err = StoreError::io(origin.clone(), &e);
        tracing::error!(source = %origin, error = %err, "address index load failed");
        err
    })?;

    let parse_origin = origin.clone();
    let parsed = tokio::task::spawn_blocking(move || {
        serde_json::from_slice::<Vec<AddressEntry>>(&bytes)
            .map_err(|e| StoreError::malformed(parse_origin, e))
    })
    .await
    .map_err(|e| StoreError::malformed(origin.clone(), format!("parse task aborted: {e}")))?;

    let mut entries = parsed.inspect_err(|err| {
        tracing::error!(source = %origin, error = %err, "address index load failed");
    })?;

    let mut recomputed = 0usize;
    for entry in &mut entries {
        if entry.ensure_normalized() {
            recomputed += 1;
        }
    }

    tracing::info!(
        source = %origin,
        entries = entries.len(),
        recomputed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "address index loaded"
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::LoadFailureKind;
    use std::io::Write;

    fn write_index(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn store_for(path: &std::path::Path) -> AddressIndexStore {
        AddressIndexStore::new(
            Arc::new(FileSource::new(path)),
            Arc::new(ManualClock::new()),
            ADDRESS_INDEX_TTL,
        )
    }

    #[tokio::test]
    async fn loads_entries_in_file_order() {
        let file = write_index(
            r#"[
                {"logradouro": "Rua Augusta", "normalized": "rua augusta",
                 "centroid": [-23.55, -46.65], "setor": "S-02", "name": "Consolação"},
                {"logradouro": "Avenida Paulista", "normalized": "avenida paulista",
                 "centroid": [-23.56, -46.65], "setor": "S-01", "name": "Bela Vista",
                 "subprefeitura": "Sé"}
            ]"#,
        );
        let store = store_for(file.path());
        assert!(!store.is_loaded());

        let index = store.get().await.unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index[0].street, "Rua Augusta");
        assert_eq!(index[1].subprefecture.as_deref(), Some("Sé"));
        assert!(store.is_loaded());
        assert_eq!(store.generation(), 1);
    }

    #[tokio::test]
    async fn missing_normalized_field_is_filled() {
        let file = write_index(
            r#"[{"logradouro": "Praça da Sé", "centroid": [-23.55, -46.63],
                 "setor": "S-05", "name": "Sé"}]"#,
        );
        let index = store_for(file.path()).get().await.unwrap();
        assert_eq!(index[0].normalized, "praca da se");
    }

    #[tokio::test]
    async fn missing_file_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_for(&dir.path().join("addressIndex.json"));
        let err = store.get().await.unwrap_err();
        assert_eq!(err.kind(), LoadFailureKind::Missing);
        assert!(!store.is_loaded());
    }

    #[tokio::test]
    async fn malformed_file_is_a_load_failure() {
        let file = write_index("{ not json");
        let err = store_for(file.path()).get().await.unwrap_err();
        assert_eq!(err.kind(), LoadFailureKind::Malformed);
    }

    #[tokio::test]
    async fn wrong_shape_is_a_load_failure() {
        let file = write_index(r#"{"services": {}}"#);
        let err = store_for(file.path()).get().await.unwrap_err();
        assert_eq!(err.kind(), LoadFailureKind::Malformed);
    }
}
