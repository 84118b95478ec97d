//! Map Search Server - HTTP API for address autocomplete and map features
//!
//! Serves two JSON snapshots kept in time-based caches:
//!
//! - the flat address index, queried by `GET /api/search?q=`
//! - the full feature collection, returned by `GET /api/features`
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (address index loadable)
//! - `GET /metrics` - Prometheus metrics
//! - `GET /api/search?q=` - Up to ten address suggestions
//! - `GET /api/features` - Feature collection for the map
//!
//! # Configuration
//!
//! Read from an optional `server.{toml,yaml,json}` file, then `MAPSEARCH__*`
//! environment variables. `FEATURES_JSON_PATH` overrides the feature snapshot
//! location.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
