//! Order-line record types and the tables that hold them.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An order line as read from the source, before derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrderLine {
    pub order_id: String,
    pub order_item_id: i64,
    pub customer_id: String,
    pub product_category_name_english: Option<String>,
    pub price: Option<Decimal>,
    pub freight_value: Option<Decimal>,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    /// 1..=5
    pub review_score: Option<u8>,
    /// Days
    pub delivery_duration: Option<f64>,
}

/// An order line with derived columns attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineRecord {
    pub order_id: String,
    pub order_item_id: i64,
    pub customer_id: String,
    pub product_category_name_english: Option<String>,
    pub price: Option<Decimal>,
    pub freight_value: Option<Decimal>,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    pub review_score: Option<u8>,
    pub delivery_duration: Option<f64>,
    /// `price + freight_value`, null when either side is null.
    pub total_item_revenue: Option<Decimal>,
}

/// Earliest and latest delivery timestamps of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
}

/// Loader output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    rows: Vec<RawOrderLine>,
}

impl RawTable {
    pub fn new(rows: Vec<RawOrderLine>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[RawOrderLine] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<RawOrderLine> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The working table: derived order lines in delivery-date order.
///
/// Tables are never mutated after construction; every stage builds a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderTable {
    rows: Vec<OrderLineRecord>,
}

impl OrderTable {
    pub fn new(rows: Vec<OrderLineRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[OrderLineRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderLineRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Min and max non-null delivery dates, `None` if every date is null.
    pub fn date_bounds(&self) -> Option<DateBounds> {
        let mut dates = self
            .rows
            .iter()
            .filter_map(|r| r.order_delivered_customer_date);
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(DateBounds { min, max })
    }
}

impl<'a> IntoIterator for &'a OrderTable {
    type Item = &'a OrderLineRecord;
    type IntoIter = std::slice::Iter<'a, OrderLineRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
