//! Filter stage: restricts the working table to a delivery-date range.

use dashboard_core::{DateRange, OrderTable};
use tracing::debug;

/// Returns the rows delivered within `range`, inclusive on both ends.
///
/// Rows without a delivery date never match a range. With no range the
/// whole table is returned. The input table is never modified, so any
/// number of filters can run against the same base table.
pub fn filter_by_delivery(table: &OrderTable, range: Option<&DateRange>) -> OrderTable {
    let Some(range) = range else {
        return table.clone();
    };

    let rows: Vec<_> = table
        .iter()
        .filter(|r| range.contains(r.order_delivered_customer_date))
        .cloned()
        .collect();

    debug!(
        start = %range.start(),
        end = %range.end(),
        kept = rows.len(),
        total = table.len(),
        "Applied delivery date filter"
    );

    OrderTable::new(rows)
}
