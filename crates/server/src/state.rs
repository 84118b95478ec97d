use crate::config::ServerConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use store::{AddressIndexStore, FeatureDataStore, FileSource, SnapshotSource, SystemClock};

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Address index used by `/api/search`
    pub addresses: Arc<AddressIndexStore>,

    /// Feature collection served by `/api/features`
    pub features: Arc<FeatureDataStore>,

    /// Prometheus exporter, present when metrics are enabled and installed
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// File-backed stores at the paths named by `config`
    pub fn new(config: ServerConfig) -> Self {
        let clock = Arc::new(SystemClock);

        let addresses = AddressIndexStore::new(
            Arc::new(FileSource::new(config.address_index_path())),
            clock.clone(),
            config.address_index_ttl(),
        );
        let features = FeatureDataStore::new(
            Arc::new(FileSource::new(config.features_path())),
            Some(Arc::new(FileSource::new(config.features_sample_path())) as Arc<dyn SnapshotSource>),
            clock,
            config.features_ttl(),
        );

        Self::with_stores(config, addresses, features)
    }

    /// State around stores built elsewhere
    pub fn with_stores(
        config: ServerConfig,
        addresses: AddressIndexStore,
        features: FeatureDataStore,
    ) -> Self {
        Self {
            config: Arc::new(config),
            addresses: Arc::new(addresses),
            features: Arc::new(features),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Loads both snapshots so the first requests do not pay for it.
    ///
    /// A missing address index is logged, not fatal; `/api/search` reports it
    /// per request until the file appears.
    pub async fn warm_up(&self) {
        let collection = self.features.load().await;
        match self.addresses.get().await {
            Ok(index) => tracing::info!(
                addresses = index.len(),
                features = collection.feature_count(),
                "snapshots ready"
            ),
            Err(err) => tracing::error!(
                error = %err,
                features = collection.feature_count(),
                "address index not available at startup"
            ),
        }
    }
}
