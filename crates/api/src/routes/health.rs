//! Health check endpoint.

use axum::{extract::State, Json};
use telemetry::metrics;

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - Dataset size and pipeline metrics.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        rows: state.dashboard.base().len(),
        metrics: metrics().snapshot(),
    })
}
