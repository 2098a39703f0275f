//! Tests for the dashboard HTTP endpoints.
//!
//! These run the full load → derive → filter → aggregate path behind the
//! real router, over the fixture dataset.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::setup::TestContext;
use telemetry::metrics;

async fn server() -> TestServer {
    let ctx = TestContext::new().await;
    TestServer::new(ctx.router).expect("Failed to create test server")
}

/// Test unfiltered dashboard covers every row
#[tokio::test]
async fn test_unfiltered_dashboard() {
    let server = server().await;

    let response = server.get("/api/dashboard").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["record_count"], 8);
    assert_eq!(body["empty"], false);
    assert!(body["range"].is_null());

    let kpis = &body["kpis"];
    assert_eq!(kpis["total_revenue"].as_f64(), Some(513.0));
    assert_eq!(kpis["total_orders"], 7);
    assert_eq!(kpis["total_customers"], 6);

    let categories: Vec<(&str, f64)> = body["top_categories"]["categories"]
        .as_array()
        .expect("categories array")
        .iter()
        .map(|c| {
            (
                c["category"].as_str().unwrap(),
                c["total_item_revenue"].as_f64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        categories,
        vec![
            ("garden_tools", 220.0),
            ("health_beauty", 165.0),
            ("toys", 80.0),
            ("books", 18.0),
        ]
    );
    assert_eq!(body["top_categories"]["uncategorized_rows"], 1);
}

/// Test the date filter is inclusive and whole-day
#[tokio::test]
async fn test_filtered_dashboard() {
    let server = server().await;

    let response = server
        .get("/api/dashboard")
        .add_query_param("start", "2018-01-02")
        .add_query_param("end", "2018-01-10")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["record_count"], 4);
    assert_eq!(body["kpis"]["total_revenue"].as_f64(), Some(420.0));
    assert_eq!(body["kpis"]["total_orders"], 3);
    assert_eq!(body["kpis"]["total_customers"], 3);

    // Bounds describe the base table, not the filtered view
    assert_eq!(body["bounds"]["min"], "2018-01-02T10:00:00");
    assert_eq!(body["bounds"]["max"], "2018-01-25T08:00:00");
}

/// Test top_n limits the category ranking
#[tokio::test]
async fn test_top_n_parameter() {
    let server = server().await;

    let response = server
        .get("/api/dashboard")
        .add_query_param("top_n", "2")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    let categories = body["top_categories"]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["category"], "garden_tools");
}

/// Test zero top_n returns VALID_001
#[tokio::test]
async fn test_zero_top_n_rejected() {
    let server = server().await;

    let response = server
        .get("/api/dashboard")
        .add_query_param("top_n", "0")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}

/// Test reversed range returns RANGE_001 and keeps the previous filter
#[tokio::test]
async fn test_invalid_range_keeps_previous_filter() {
    let server = server().await;

    server
        .get("/api/dashboard")
        .add_query_param("start", "2018-01-05")
        .add_query_param("end", "2018-01-15")
        .await
        .assert_status_ok();

    let response = server
        .get("/api/dashboard")
        .add_query_param("start", "2018-01-20")
        .add_query_param("end", "2018-01-01")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "RANGE_001");
    assert_eq!(body["retained_range"]["start"], "2018-01-05T00:00:00");

    let filter: serde_json::Value = server.get("/api/filter").await.json();
    assert_eq!(filter["range"]["start"], "2018-01-05T00:00:00");
}

/// Test rejected ranges and empty results are counted
#[tokio::test]
async fn test_rejections_and_empty_results_are_counted() {
    let server = server().await;
    let invalid_before = metrics().invalid_ranges.get();
    let empty_before = metrics().empty_results.get();

    server
        .get("/api/dashboard")
        .add_query_param("start", "2018-01-20")
        .add_query_param("end", "2018-01-01")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/dashboard")
        .add_query_param("start", "2018-01-16")
        .add_query_param("end", "2018-01-19")
        .await
        .assert_status_ok();

    // Other tests share the registry, so only growth is asserted
    assert!(metrics().invalid_ranges.get() > invalid_before);
    assert!(metrics().empty_results.get() > empty_before);

    let health: serde_json::Value = server.get("/health").await.json();
    assert!(health["metrics"]["invalid_ranges"].as_u64().unwrap() >= 1);
}

/// Test a range with no deliveries yields an explicit empty state
#[tokio::test]
async fn test_empty_range_is_empty_state() {
    let server = server().await;

    let response = server
        .get("/api/dashboard")
        .add_query_param("start", "2018-01-16")
        .add_query_param("end", "2018-01-19")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["empty"], true);
    assert!(body["kpis"].is_null());
    assert_eq!(body["record_count"], 0);
    assert_eq!(body["metric_means"][0]["metric"], "delivery_duration");
    assert_eq!(body["metric_means"][0]["unit"], "days");
    assert!(body["metric_means"][0]["average_value"].is_null());
}

/// Test a half-selected range is served unfiltered
#[tokio::test]
async fn test_single_bound_is_unfiltered() {
    let server = server().await;

    let response = server
        .get("/api/dashboard")
        .add_query_param("start", "2018-01-20")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["record_count"], 8);
}

/// Test bounds endpoint
#[tokio::test]
async fn test_bounds_endpoint() {
    let server = server().await;

    let response = server.get("/api/bounds").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["bounds"]["min"], "2018-01-02T10:00:00");
    assert_eq!(body["bounds"]["max"], "2018-01-25T08:00:00");
}

/// Test health endpoint reports dataset size
#[tokio::test]
async fn test_health_endpoint() {
    let server = server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["rows"], 8);
    assert!(body["metrics"].get("pipeline_runs").is_some());
    assert_eq!(
        body["metrics"]["pipeline_latency_buckets"]
            .as_array()
            .map(Vec::len),
        Some(11)
    );
}
