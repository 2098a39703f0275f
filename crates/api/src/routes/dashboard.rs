//! Dashboard endpoints.
//!
//! A rejected request leaves the session filter as it was and reports it
//! back as `retained_range`, so the UI can keep showing the last render.

use axum::{
    extract::{Query, State},
    Json,
};
use dashboard_core::Error;
use pipeline::DashboardSnapshot;
use telemetry::metrics;
use tracing::{info, warn};

use crate::query::DashboardQuery;
use crate::response::{ApiError, BoundsResponse, FilterResponse};
use crate::state::AppState;

/// GET /api/dashboard - Runs the pipeline for the selected range.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    let reject = |err: Error| {
        if matches!(err, Error::InvalidRange { .. }) {
            metrics().invalid_ranges.inc();
        }
        warn!(code = err.error_code(), error = %err, "Dashboard request rejected");
        ApiError::from(err).with_retained_range(state.current_range())
    };

    let range = query.range().map_err(reject)?;
    let top_n = query.top_n(state.default_top_n).map_err(reject)?;

    let snapshot = state.dashboard.run(range, top_n).map_err(reject)?;
    state.set_current_range(range);

    info!(
        run_id = %snapshot.run_id,
        records = snapshot.record_count,
        empty = snapshot.empty,
        "Dashboard served"
    );

    Ok(Json(snapshot))
}

/// GET /api/bounds - Delivery-date extremes for the date picker.
pub async fn bounds_handler(State(state): State<AppState>) -> Result<Json<BoundsResponse>, ApiError> {
    let bounds = state
        .dashboard
        .base()
        .date_bounds()
        .ok_or_else(|| Error::no_data("no delivered orders in the dataset"))?;
    Ok(Json(BoundsResponse { bounds }))
}

/// GET /api/filter - Filter of the last successful render.
pub async fn filter_handler(State(state): State<AppState>) -> Json<FilterResponse> {
    Json(FilterResponse {
        range: state.current_range(),
    })
}
