//! Inclusive delivery-date ranges used by the filter stage.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Closed interval `[start, end]` over delivery timestamps.
///
/// Deserialization goes through [`DateRange::new`], so a decoded range is
/// never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct RangeBounds {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RangeBounds> for DateRange {
    type Error = Error;

    fn try_from(bounds: RangeBounds) -> Result<Self> {
        Self::new(bounds.start, bounds.end)
    }
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering whole calendar days, from midnight of `start` through
    /// the last instant of `end`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let start_ts = start.and_time(NaiveTime::default());
        let end_midnight = end.and_time(NaiveTime::default());
        if start > end {
            return Err(Error::InvalidRange {
                start: start_ts,
                end: end_midnight,
            });
        }
        let end_ts = end
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| Error::internal(format!("no end-of-day timestamp for {}", end)))?;
        Ok(Self {
            start: start_ts,
            end: end_ts,
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Inclusive membership test. A missing date never matches.
    pub fn contains(&self, ts: Option<NaiveDateTime>) -> bool {
        ts.is_some_and(|t| self.start <= t && t <= self.end)
    }
}
