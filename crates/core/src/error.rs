//! Unified error types for the dashboard engine.
//!
//! Error codes:
//! - SOURCE_001: Data source unavailable
//! - RECORD_001-002: Malformed record / missing column
//! - RANGE_001: Invalid date range
//! - DATA_001: Empty row set
//! - VALID_001: Invalid caller argument

use chrono::NaiveDateTime;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the dashboard engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The data source could not be reached or read.
    #[error("source unavailable: {locator}: {reason}")]
    SourceUnavailable { locator: String, reason: String },

    /// A row failed to parse. `row` is the 1-based data row number.
    #[error("malformed record at row {row}, column '{column}' (value {value:?}): {reason}")]
    MalformedRecord {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("schema error: {0}")]
    Schema(String),

    /// Filter range with start after end.
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("no data: {0}")]
    NoData(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn source_unavailable(locator: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(
        row: usize,
        column: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            row,
            column: column.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "SOURCE_001",
            Self::MalformedRecord { .. } => "RECORD_001",
            Self::Schema(_) => "RECORD_002",
            Self::InvalidRange { .. } => "RANGE_001",
            Self::NoData(_) => "DATA_001",
            Self::Validation(_) => "VALID_001",
            Self::Internal(_) => "INTERNAL_001",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRange { .. } => 400,
            Self::Validation(_) => 400,
            Self::NoData(_) => 404,
            Self::SourceUnavailable { .. } => 503,
            Self::MalformedRecord { .. } => 500,
            Self::Schema(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Whether the error leaves previously rendered state usable.
    ///
    /// Load-time failures abort startup; filter and aggregation errors are
    /// local to one render cycle.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. } | Self::NoData(_) | Self::Validation(_)
        )
    }
}
