//! Column schema of the order-line dataset.
//!
//! One canonical schema is used throughout: delivery durations are named
//! `delivery_duration` and measured in days.

pub const ORDER_ID: &str = "order_id";
pub const ORDER_ITEM_ID: &str = "order_item_id";
pub const CUSTOMER_ID: &str = "customer_id";
pub const CATEGORY: &str = "product_category_name_english";
pub const PRICE: &str = "price";
pub const FREIGHT_VALUE: &str = "freight_value";
pub const DELIVERED_DATE: &str = "order_delivered_customer_date";
pub const REVIEW_SCORE: &str = "review_score";
pub const DELIVERY_DURATION: &str = "delivery_duration";

/// Derived column. Never read from the source.
pub const TOTAL_ITEM_REVENUE: &str = "total_item_revenue";

/// Columns every source must provide.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    ORDER_ID,
    ORDER_ITEM_ID,
    CUSTOMER_ID,
    CATEGORY,
    PRICE,
    FREIGHT_VALUE,
    DELIVERED_DATE,
    REVIEW_SCORE,
    DELIVERY_DURATION,
];

/// Unit of `delivery_duration`.
pub const DELIVERY_DURATION_UNIT: &str = "days";

/// Returns the required columns missing from a header row.
pub fn missing_columns<'a, I>(headers: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = headers.into_iter().map(str::trim).collect();
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !present.contains(col))
        .collect()
}
