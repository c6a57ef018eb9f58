//! Test helper utilities for dashboard integration tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::net::SocketAddr;
use tower::ServiceExt;

use dashboard::traits::{MeasurementStore, MockAirQualityApi};
use dashboard::{DashboardServer, RefreshConfig, SqliteMeasurementStore, ViewDefaults};
use shared::PlaceBatch;

pub type TestServer = DashboardServer<MockAirQualityApi, SqliteMeasurementStore>;

pub fn create_test_address() -> SocketAddr {
    "127.0.0.1:5000".parse().unwrap()
}

/// Server over an initialized in-memory store holding `batches`
pub async fn create_test_server(api: MockAirQualityApi, batches: Vec<PlaceBatch>) -> TestServer {
    let store = SqliteMeasurementStore::open_in_memory().unwrap();
    store.initialize().await.unwrap();
    if !batches.is_empty() {
        store.replace_all(batches).await.unwrap();
    }

    DashboardServer::new(
        create_test_address(),
        api,
        store,
        RefreshConfig::default(),
        ViewDefaults::default(),
    )
}

/// Send one request through the router and collect status and body
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    send(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_form(router: Router, uri: &str, form: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(router, request).await
}
