//! Prometheus output for a server with metrics installed.
//!
//! Installing the recorder is process-wide, so this binary holds one test.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::json;
use server::telemetry::install_metrics;
use server::{build_router, ServerConfig, ServerState};
use tower::ServiceExt;

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn sample_line<'a>(text: &'a str, series: &str) -> Option<&'a str> {
    text.lines()
        .find(|line| line.starts_with(series))
        .and_then(|line| line.rsplit(' ').next())
}

#[tokio::test]
async fn test_cache_loads_are_exported() {
    let handle = install_metrics().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let state = ServerState::new(ServerConfig::with_data_dir(dir.path())).with_metrics(handle);
    let app = build_router(Arc::new(state));

    let (status, _) = get(&app, "/api/search?q=rua").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    std::fs::write(
        dir.path().join("addressIndex.json"),
        serde_json::to_vec(&json!([
            { "logradouro": "Rua Augusta", "centroid": [-23.5558, -46.6621],
              "setor": "S-02", "name": "Consolação" }
        ]))
        .unwrap(),
    )
    .unwrap();
    let (status, _) = get(&app, "/api/search?q=rua").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, "/api/features").await;
    assert_eq!(status, StatusCode::OK);

    let (status, text) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        sample_line(&text, r#"mapsearch_cache_load_failures_total{cache="address"}"#),
        Some("1")
    );
    assert_eq!(
        sample_line(&text, r#"mapsearch_cache_reloads_total{cache="address"}"#),
        Some("1")
    );
    assert_eq!(
        sample_line(&text, r#"mapsearch_cache_entries{cache="address"}"#),
        Some("1")
    );
    // Primary and sample are both missing, so the empty collection is served.
    assert_eq!(
        sample_line(&text, r#"mapsearch_cache_load_failures_total{cache="features"}"#),
        Some("2")
    );
    assert_eq!(
        sample_line(&text, r#"mapsearch_cache_reloads_total{cache="features"}"#),
        Some("1")
    );
    assert!(text.contains("mapsearch_search_requests_total"));
}
