//! Derivation stage: adds computed columns to loaded rows.

use dashboard_core::{OrderLineRecord, OrderTable, RawOrderLine, RawTable};

/// Builds the working table, computing `total_item_revenue` for every row.
///
/// Missing `price` or `freight_value` yields a missing revenue, never zero.
pub fn derive_revenue(raw: &RawTable) -> OrderTable {
    OrderTable::new(raw.rows().iter().map(derive_row).collect())
}

fn derive_row(row: &RawOrderLine) -> OrderLineRecord {
    let total_item_revenue = match (row.price, row.freight_value) {
        (Some(price), Some(freight)) => Some(price + freight),
        _ => None,
    };

    OrderLineRecord {
        order_id: row.order_id.clone(),
        order_item_id: row.order_item_id,
        customer_id: row.customer_id.clone(),
        product_category_name_english: row.product_category_name_english.clone(),
        price: row.price,
        freight_value: row.freight_value,
        order_delivered_customer_date: row.order_delivered_customer_date,
        review_score: row.review_score,
        delivery_duration: row.delivery_duration,
        total_item_revenue,
    }
}
