//! Load entry point: fetch, parse, order.

use std::cmp::Ordering;
use std::time::Instant;

use dashboard_core::{RawOrderLine, RawTable, Result};
use telemetry::metrics;
use tracing::{error, info};

use crate::parse::parse_records;
use crate::source::RecordSource;

/// Loads the dataset behind `source` into a table ordered by delivery date.
///
/// Any failure aborts the load; there is no retry and no partial table.
/// Calling this repeatedly against the same source yields the same table.
pub async fn load_records(source: &dyn RecordSource) -> Result<RawTable> {
    let start = Instant::now();
    let locator = source.locator();

    info!(source = %locator, "Loading order dataset");

    let result = async {
        let bytes = source.fetch().await?;
        let table = parse_records(&bytes)?;
        Ok::<_, dashboard_core::Error>(sort_by_delivery(table))
    }
    .await;

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().load_latency_ms.observe(latency_ms);

    match result {
        Ok(table) => {
            metrics().rows_loaded.inc_by(table.len() as u64);
            info!(
                source = %locator,
                rows = table.len(),
                latency_ms = latency_ms,
                "Order dataset loaded"
            );
            Ok(table)
        }
        Err(e) => {
            metrics().load_failures.inc();
            error!(source = %locator, error = %e, "Failed to load order dataset");
            Err(e)
        }
    }
}

/// Stable ascending sort on delivery date with missing dates last.
pub fn sort_by_delivery(table: RawTable) -> RawTable {
    let mut rows = table.into_rows();
    rows.sort_by(compare_delivery);
    RawTable::new(rows)
}

fn compare_delivery(a: &RawOrderLine, b: &RawOrderLine) -> Ordering {
    match (a.order_delivered_customer_date, b.order_delivered_customer_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
