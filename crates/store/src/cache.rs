//! Time-to-live cache with single-flight refresh.
//!
//! A [`TtlCache`] holds at most one [`CacheEntry`]. Reads inside the TTL
//! window share the same `Arc` snapshot. Once the entry is stale, exactly one
//! caller runs the loader; callers arriving while that load is in flight get
//! the previous snapshot if there is one, and otherwise wait for the load.
//! Entries are swapped in whole, never mutated.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::clock::Clock;

/// A cached value and the instant it was loaded.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub value: Arc<T>,
    pub loaded_at: Instant,
}

impl<T> CacheEntry<T> {
    /// Valid while `now - loaded_at < ttl`.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.loaded_at) < ttl
    }
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            loaded_at: self.loaded_at,
        }
    }
}

#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<CacheEntry<T>>>,
    refresh: Mutex<()>,
    loads: AtomicU64,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: RwLock::new(None),
            refresh: Mutex::new(()),
            loads: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of successful loads so far.
    pub fn generation(&self) -> u64 {
        self.loads.load(Ordering::Acquire)
    }

    /// Current entry regardless of age.
    pub fn peek(&self) -> Option<CacheEntry<T>> {
        self.entry
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Current value if it is still inside the TTL window.
    pub fn fresh(&self) -> Option<Arc<T>> {
        let now = self.clock.now();
        self.entry
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .filter(|e| e.is_fresh(now, self.ttl))
            .map(|e| Arc::clone(&e.value))
    }

    fn store(&self, value: Arc<T>) {
        let entry = CacheEntry {
            value,
            loaded_at: self.clock.now(),
        };
        *self.entry.write().unwrap_or_else(|p| p.into_inner()) = Some(entry);
        self.loads.fetch_add(1, Ordering::AcqRel);
    }

    /// Returns the fresh value, or runs `load` to replace it.
    ///
    /// A failed load leaves the previous entry in place and returns the error;
    /// the next call tries again.
    pub async fn get_or_refresh<F, Fut, E>(&self, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.fresh() {
            return Ok(value);
        }

        let _guard = match self.refresh.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                if let Some(stale) = self.peek() {
                    tracing::debug!("refresh in flight, serving previous snapshot");
                    return Ok(stale.value);
                }
                self.refresh.lock().await
            }
        };

        // The load we waited on may have already produced a fresh value.
        if let Some(value) = self.fresh() {
            return Ok(value);
        }

        let value = Arc::new(load().await?);
        self.store(Arc::clone(&value));
        Ok(value)
    }
}

/// Records one loader run for the named cache with the `metrics` facade.
pub(crate) fn record_load(cache: &'static str, outcome: Result<usize, ()>) {
    match outcome {
        Ok(entries) => {
            metrics::counter!("mapsearch_cache_reloads_total", "cache" => cache).increment(1);
            metrics::gauge!("mapsearch_cache_entries", "cache" => cache).set(entries as f64);
        }
        Err(()) => {
            metrics::counter!("mapsearch_cache_load_failures_total", "cache" => cache)
                .increment(1);
        }
    }
}
