//! Query-string parameters of the dashboard endpoint.

use chrono::NaiveDate;
use dashboard_core::{DateRange, Error, Result};
use serde::Deserialize;

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD&top_n=N`
///
/// Values arrive as strings so malformed input maps to our own error codes
/// instead of a framework rejection.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub top_n: Option<String>,
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("{name} must be YYYY-MM-DD, got {value:?}")))
}

impl DashboardQuery {
    /// Selected date range.
    ///
    /// Both bounds filter on whole days. With zero or one bound the
    /// selection is incomplete and the full table is used.
    pub fn range(&self) -> Result<Option<DateRange>> {
        match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) => {
                let start = parse_date("start", start)?;
                let end = parse_date("end", end)?;
                DateRange::from_dates(start, end).map(Some)
            }
            _ => Ok(None),
        }
    }

    pub fn top_n(&self, default: usize) -> Result<usize> {
        let Some(raw) = self.top_n.as_deref() else {
            return Ok(default);
        };
        match raw.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(Error::validation(format!(
                "top_n must be a positive integer, got {raw:?}"
            ))),
        }
    }
}
