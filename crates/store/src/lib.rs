//! Snapshot stores for the map server.
//!
//! Two JSON snapshots back the server: the full feature collection drawn on
//! the map and the flat address index used for autocomplete. Both are large,
//! so each is loaded once and kept in a [`TtlCache`] that is replaced
//! wholesale when it expires.
//!
//! - [`AddressIndexStore`] raises [`StoreError::LoadFailure`] when the index
//!   cannot be read. There is no fallback snapshot.
//! - [`FeatureDataStore`] never fails: primary path, then bundled sample,
//!   then an empty collection centred on São Paulo.
//!
//! Clock and storage are injected ([`Clock`], [`SnapshotSource`]) so TTL
//! behaviour can be tested deterministically.

pub mod address;
pub mod cache;
pub mod clock;
pub mod error;
pub mod features;
pub mod icons;
pub mod source;

pub use crate::address::{AddressIndexStore, ADDRESS_INDEX_TTL};
pub use crate::cache::{CacheEntry, TtlCache};
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::error::{LoadFailureKind, StoreError, StoreResult};
pub use crate::features::{
    Bounds, FeatureCollection, FeatureDataStore, FeatureRecord, Geometry, DEFAULT_CENTER,
    FEATURES_TTL,
};
pub use crate::icons::{resolve_icon, IconResolution, ServiceIconKey, UnknownIconKey};
pub use crate::source::{FileSource, SnapshotSource};
