//! Prometheus recorder and the matcher's metrics hook.

use matcher::SearchMetrics;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;

/// Forwards matcher query observations to the `metrics` facade.
#[derive(Debug, Default)]
pub struct PrometheusSearchMetrics;

impl SearchMetrics for PrometheusSearchMetrics {
    fn record_query(&self, latency: Duration, token_count: usize, hit_count: usize) {
        metrics::histogram!("mapsearch_match_latency_seconds").record(latency.as_secs_f64());
        metrics::histogram!("mapsearch_match_tokens").record(token_count as f64);
        metrics::histogram!("mapsearch_match_hits").record(hit_count as f64);
    }
}

/// Installs the global Prometheus recorder and the matcher hook.
pub fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {e}"))?;
    matcher::set_search_metrics(Some(Arc::new(PrometheusSearchMetrics)));
    Ok(handle)
}
