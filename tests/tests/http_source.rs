//! Tests for the HTTP dataset source against a local server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use dashboard_core::Error;
use integration_tests::fixtures;
use record_loader::{load_records, HttpSource, RecordSource};
use tokio::net::TcpListener;
use url::Url;

const TIMEOUT: Duration = Duration::from_millis(300);

/// Serves the sample dataset plus failing routes on an ephemeral port.
async fn spawn_dataset_server() -> SocketAddr {
    let app = Router::new()
        .route("/orders.csv", get(|| async { fixtures::sample_csv() }))
        .route("/missing.csv", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/slow.csv",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                fixtures::sample_csv()
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

fn source(addr: SocketAddr, path: &str) -> HttpSource {
    let url = Url::parse(&format!("http://{addr}{path}")).unwrap();
    HttpSource::new(url, TIMEOUT).unwrap()
}

/// Test a 200 response loads through the real parser
#[tokio::test]
async fn test_remote_dataset_loads() {
    let addr = spawn_dataset_server().await;
    let table = load_records(&source(addr, "/orders.csv")).await.unwrap();
    assert_eq!(table.len(), 8);
}

/// Test a non-2xx status is SourceUnavailable and names the status
#[tokio::test]
async fn test_error_status_is_source_unavailable() {
    let addr = spawn_dataset_server().await;
    let src = source(addr, "/missing.csv");

    match src.fetch().await.unwrap_err() {
        Error::SourceUnavailable { locator, reason } => {
            assert!(locator.ends_with("/missing.csv"));
            assert!(reason.contains("404"), "reason was {reason:?}");
        }
        other => panic!("Expected SourceUnavailable, got {other:?}"),
    }
}

/// Test a refused connection is SourceUnavailable
#[tokio::test]
async fn test_refused_connection_is_source_unavailable() {
    // Bind then drop to get a port nothing listens on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let err = source(addr, "/orders.csv").fetch().await.unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
    assert_eq!(err.error_code(), "SOURCE_001");
}

/// Test a server slower than the fetch timeout is SourceUnavailable
#[tokio::test]
async fn test_timeout_is_source_unavailable() {
    let addr = spawn_dataset_server().await;
    let started = std::time::Instant::now();

    let err = source(addr, "/slow.csv").fetch().await.unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
    assert!(started.elapsed() < Duration::from_secs(5));
}
