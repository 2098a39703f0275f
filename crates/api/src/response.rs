//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard_core::{DateBounds, DateRange};
use serde::{Deserialize, Serialize};
use telemetry::MetricsSnapshot;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub rows: usize,
    pub metrics: MetricsSnapshot,
}

/// Delivery-date extremes of the base table.
#[derive(Debug, Serialize, Deserialize)]
pub struct BoundsResponse {
    pub bounds: DateBounds,
}

/// Filter currently applied to the session.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilterResponse {
    pub range: Option<DateRange>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// Filter still in effect after a rejected request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retained_range: Option<DateRange>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            retained_range: None,
        }
    }
}

/// API error type with error codes.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
        }
    }

    /// Reports the filter that stays active after this error.
    pub fn with_retained_range(mut self, range: Option<DateRange>) -> Self {
        self.response.retained_range = range;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<dashboard_core::Error> for ApiError {
    fn from(err: dashboard_core::Error) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ApiError::with_code(status, err.error_code(), err.to_string())
    }
}
