// Metrics hooks for the `matcher` crate.
//
// Callers install a global `SearchMetrics` implementation via
// [`set_search_metrics`]; every call to [`crate::query`] that passes the
// length guard then reports its latency and hit count.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Metrics observer for address queries.
pub trait SearchMetrics: Send + Sync {
    /// Record the outcome of one query.
    ///
    /// `token_count` is the number of normalized query tokens and `hit_count`
    /// the number of results returned after the cap.
    fn record_query(&self, latency: Duration, token_count: usize, hit_count: usize);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn SearchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn SearchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn SearchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global search metrics recorder.
pub fn set_search_metrics(recorder: Option<Arc<dyn SearchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
