use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that points the feature store at a different snapshot.
pub const FEATURES_PATH_ENV: &str = "FEATURES_JSON_PATH";

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Directory holding the JSON snapshots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Feature collection snapshot, defaults to `<data_dir>/features.json`
    #[serde(default)]
    pub features_path: Option<PathBuf>,

    /// Bundled fallback snapshot, defaults to `<data_dir>/features.sample.json`
    #[serde(default)]
    pub features_sample_path: Option<PathBuf>,

    /// Address index snapshot, defaults to `<data_dir>/addressIndex.json`
    #[serde(default)]
    pub address_index_path: Option<PathBuf>,

    /// How long a loaded address index is served, in seconds
    #[serde(default = "default_address_index_ttl_secs")]
    pub address_index_ttl_secs: u64,

    /// How long a loaded feature collection is served, in seconds
    #[serde(default = "default_features_ttl_secs")]
    pub features_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            data_dir: default_data_dir(),
            features_path: None,
            features_sample_path: None,
            address_index_path: None,
            address_index_ttl_secs: default_address_index_ttl_secs(),
            features_ttl_secs: default_features_ttl_secs(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("server").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("MAPSEARCH").separator("__"));

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        if let Some(path) = std::env::var_os(FEATURES_PATH_ENV).filter(|p| !p.is_empty()) {
            config.features_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Config rooted at `data_dir` with every other field at its default
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn features_path(&self) -> PathBuf {
        self.features_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("features.json"))
    }

    pub fn features_sample_path(&self) -> PathBuf {
        self.features_sample_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("features.sample.json"))
    }

    pub fn address_index_path(&self) -> PathBuf {
        self.address_index_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("addressIndex.json"))
    }

    pub fn address_index_ttl(&self) -> Duration {
        Duration::from_secs(self.address_index_ttl_secs)
    }

    pub fn features_ttl(&self) -> Duration {
        Duration::from_secs(self.features_ttl_secs)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_address_index_ttl_secs() -> u64 {
    5 * 60
}

fn default_features_ttl_secs() -> u64 {
    10 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.timeout_secs, 30);
        assert!(cfg.enable_cors);
        assert!(cfg.metrics_enabled);
        assert_eq!(cfg.address_index_ttl(), Duration::from_secs(300));
        assert_eq!(cfg.features_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_snapshot_paths_follow_data_dir() {
        let cfg = ServerConfig::with_data_dir("/srv/map");
        assert_eq!(cfg.features_path(), PathBuf::from("/srv/map/features.json"));
        assert_eq!(
            cfg.features_sample_path(),
            PathBuf::from("/srv/map/features.sample.json")
        );
        assert_eq!(
            cfg.address_index_path(),
            PathBuf::from("/srv/map/addressIndex.json")
        );
    }

    #[test]
    fn test_explicit_paths_win() {
        let cfg = ServerConfig {
            features_path: Some(PathBuf::from("/tmp/custom.json")),
            ..ServerConfig::with_data_dir("/srv/map")
        };
        assert_eq!(cfg.features_path(), PathBuf::from("/tmp/custom.json"));
    }
}
