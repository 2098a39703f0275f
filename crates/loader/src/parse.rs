//! CSV parsing into typed order-line rows.
//!
//! Parsing is fail-fast: the first cell that cannot be typed aborts the
//! whole load with a `MalformedRecord` naming the row and column.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use dashboard_core::limits::{MAX_CURRENCY_AMOUNT, REVIEW_SCORE_MAX, REVIEW_SCORE_MIN};
use dashboard_core::schema::{self, missing_columns};
use dashboard_core::{Error, RawOrderLine, RawTable, Result};
use rust_decimal::Decimal;
use tracing::debug;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Tokens treated as a missing value in numeric and date columns.
fn is_null_token(cell: &str) -> bool {
    cell.is_empty()
        || ["nan", "nat", "null", "none", "na"]
            .iter()
            .any(|t| cell.eq_ignore_ascii_case(t))
}

/// Parses a CSV dataset with a header row.
///
/// Columns beyond the required set are ignored, including any upstream
/// `total_item_revenue`.
pub fn parse_records(data: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| Error::schema(format!("unreadable header row: {}", e)))?
        .clone();

    if headers.iter().any(|h| h == schema::TOTAL_ITEM_REVENUE) {
        debug!(
            column = schema::TOTAL_ITEM_REVENUE,
            "Ignoring source column, revenue is always derived"
        );
    }

    let missing = missing_columns(headers.iter());
    if !missing.is_empty() {
        return Err(Error::schema(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name, i))
        .collect();

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| Error::malformed(row, "*", "", e.to_string()))?;
        rows.push(RowReader::new(row, &record, &index).read()?);
    }

    Ok(RawTable::new(rows))
}

/// Typed cell access for one CSV record.
struct RowReader<'a> {
    row: usize,
    record: &'a StringRecord,
    index: &'a HashMap<&'a str, usize>,
}

impl<'a> RowReader<'a> {
    fn new(row: usize, record: &'a StringRecord, index: &'a HashMap<&'a str, usize>) -> Self {
        Self { row, record, index }
    }

    fn read(&self) -> Result<RawOrderLine> {
        Ok(RawOrderLine {
            order_id: self.required_str(schema::ORDER_ID)?,
            order_item_id: self.integer(schema::ORDER_ITEM_ID)?,
            customer_id: self.required_str(schema::CUSTOMER_ID)?,
            product_category_name_english: self.optional_str(schema::CATEGORY),
            price: self.money(schema::PRICE)?,
            freight_value: self.money(schema::FREIGHT_VALUE)?,
            order_delivered_customer_date: self.timestamp(schema::DELIVERED_DATE)?,
            review_score: self.review_score(schema::REVIEW_SCORE)?,
            delivery_duration: self.non_negative(schema::DELIVERY_DURATION)?,
        })
    }

    fn cell(&self, column: &str) -> &'a str {
        self.index
            .get(column)
            .and_then(|&i| self.record.get(i))
            .unwrap_or("")
    }

    fn malformed(&self, column: &str, value: &str, reason: impl Into<String>) -> Error {
        Error::malformed(self.row, column, value, reason)
    }

    fn required_str(&self, column: &str) -> Result<String> {
        let cell = self.cell(column);
        if cell.is_empty() {
            return Err(self.malformed(column, cell, "required value is empty"));
        }
        Ok(cell.to_string())
    }

    fn optional_str(&self, column: &str) -> Option<String> {
        let cell = self.cell(column);
        (!cell.is_empty()).then(|| cell.to_string())
    }

    fn number(&self, column: &str) -> Result<Option<f64>> {
        let cell = self.cell(column);
        if is_null_token(cell) {
            return Ok(None);
        }
        match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            Ok(_) => Err(self.malformed(column, cell, "number is not finite")),
            Err(_) => Err(self.malformed(column, cell, "not a number")),
        }
    }

    /// Integer cell. Integral floats such as `2.0` are accepted.
    fn integer(&self, column: &str) -> Result<i64> {
        let cell = self.cell(column);
        if let Ok(v) = cell.parse::<i64>() {
            return Ok(v);
        }
        match self.number(column)? {
            // 2^63 itself is not representable, hence the strict upper bound.
            Some(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
                Ok(v as i64)
            }
            Some(v) if v.fract() == 0.0 => {
                Err(self.malformed(column, cell, "integer out of range"))
            }
            Some(_) => Err(self.malformed(column, cell, "not an integer")),
            None => Err(self.malformed(column, cell, "required value is empty")),
        }
    }

    /// Non-negative optional number, such as a duration.
    fn non_negative(&self, column: &str) -> Result<Option<f64>> {
        match self.number(column)? {
            Some(v) if v < 0.0 => Err(self.malformed(column, self.cell(column), "negative value")),
            other => Ok(other),
        }
    }

    /// Non-negative currency amount, kept exact.
    fn money(&self, column: &str) -> Result<Option<Decimal>> {
        let cell = self.cell(column);
        if is_null_token(cell) {
            return Ok(None);
        }
        let value = Decimal::from_str(cell)
            .or_else(|_| Decimal::from_scientific(cell))
            .map_err(|_| self.malformed(column, cell, "not a currency amount"))?;
        if value < Decimal::ZERO {
            return Err(self.malformed(column, cell, "negative value"));
        }
        if value > Decimal::from(MAX_CURRENCY_AMOUNT) {
            return Err(self.malformed(column, cell, "amount too large"));
        }
        Ok(Some(value))
    }

    fn review_score(&self, column: &str) -> Result<Option<u8>> {
        let cell = self.cell(column);
        let Some(v) = self.number(column)? else {
            return Ok(None);
        };
        if v.fract() != 0.0 {
            return Err(self.malformed(column, cell, "review score is not an integer"));
        }
        if v < f64::from(REVIEW_SCORE_MIN) || v > f64::from(REVIEW_SCORE_MAX) {
            return Err(self.malformed(
                column,
                cell,
                format!(
                    "review score outside {}..={}",
                    REVIEW_SCORE_MIN, REVIEW_SCORE_MAX
                ),
            ));
        }
        Ok(Some(v as u8))
    }

    fn timestamp(&self, column: &str) -> Result<Option<NaiveDateTime>> {
        let cell = self.cell(column);
        if is_null_token(cell) {
            return Ok(None);
        }
        parse_timestamp(cell)
            .map(Some)
            .ok_or_else(|| self.malformed(column, cell, "unrecognized date/time"))
    }
}

/// Parses the timestamp layouts found in exported order data.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::default()))
        })
}
