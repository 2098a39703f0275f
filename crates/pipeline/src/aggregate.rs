//! Aggregation stage.
//!
//! Each function summarizes one filtered table and is independent of the
//! others. Sums and means only consider non-null inputs.

use std::collections::{BTreeMap, HashSet};

use dashboard_core::schema::{DELIVERY_DURATION, DELIVERY_DURATION_UNIT, REVIEW_SCORE};
use dashboard_core::{Error, OrderTable, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline figures of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub total_customers: usize,
    /// Days
    pub avg_delivery_duration: Option<f64>,
    pub avg_review_score: Option<f64>,
}

/// Revenue of one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub total_item_revenue: Decimal,
}

/// Category ranking plus what was left out of it for lack of a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategories {
    pub categories: Vec<CategoryRevenue>,
    pub uncategorized_rows: usize,
    pub uncategorized_revenue: Decimal,
}

/// Mean of one metric over the filtered rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricMean {
    pub metric: String,
    /// Unit of the metric, `None` for unitless scores.
    pub unit: Option<String>,
    /// `None` when the metric has no values in the current filter.
    pub average_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDuration {
    pub review_score: u8,
    pub mean_delivery_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDurationPoint {
    pub review_score: u8,
    pub delivery_duration: f64,
}

fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Revenue, distinct orders and customers, and the two headline means.
///
/// An empty table has no meaningful means and returns `NoData`.
pub fn kpi_summary(table: &OrderTable) -> Result<KpiSummary> {
    if table.is_empty() {
        return Err(Error::no_data("no order lines in the selected range"));
    }

    let total_revenue = table
        .iter()
        .filter_map(|r| r.total_item_revenue)
        .sum();
    let orders: HashSet<&str> = table.iter().map(|r| r.order_id.as_str()).collect();
    let customers: HashSet<&str> = table.iter().map(|r| r.customer_id.as_str()).collect();

    Ok(KpiSummary {
        total_revenue,
        total_orders: orders.len(),
        total_customers: customers.len(),
        avg_delivery_duration: mean(table.iter().filter_map(|r| r.delivery_duration)),
        avg_review_score: mean(table.iter().filter_map(|r| r.review_score.map(f64::from))),
    })
}

/// The `n` categories with the highest summed revenue.
///
/// Ties are broken by category name ascending. Rows without a category are
/// excluded from the ranking and tallied in `uncategorized_*`.
pub fn top_categories(table: &OrderTable, n: usize) -> Result<TopCategories> {
    if n == 0 {
        return Err(Error::validation("top_n must be at least 1"));
    }

    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut uncategorized_rows = 0;
    let mut uncategorized_revenue = Decimal::ZERO;

    for row in table {
        let revenue = row.total_item_revenue.unwrap_or_default();
        match row.product_category_name_english.as_deref() {
            Some(category) => *totals.entry(category).or_default() += revenue,
            None => {
                uncategorized_rows += 1;
                uncategorized_revenue += revenue;
            }
        }
    }

    let mut categories: Vec<CategoryRevenue> = totals
        .into_iter()
        .map(|(category, total)| CategoryRevenue {
            category: category.to_string(),
            total_item_revenue: total,
        })
        .collect();

    categories.sort_by(|a, b| {
        b.total_item_revenue
            .cmp(&a.total_item_revenue)
            .then_with(|| a.category.cmp(&b.category))
    });
    categories.truncate(n);

    Ok(TopCategories {
        categories,
        uncategorized_rows,
        uncategorized_revenue,
    })
}

/// Means of `delivery_duration` and `review_score`, in that order.
pub fn metric_means(table: &OrderTable) -> Vec<MetricMean> {
    vec![
        MetricMean {
            metric: DELIVERY_DURATION.to_string(),
            unit: Some(DELIVERY_DURATION_UNIT.to_string()),
            average_value: mean(table.iter().filter_map(|r| r.delivery_duration)),
        },
        MetricMean {
            metric: REVIEW_SCORE.to_string(),
            unit: None,
            average_value: mean(table.iter().filter_map(|r| r.review_score.map(f64::from))),
        },
    ]
}

/// Mean delivery duration per review score, ascending by score.
///
/// Scores without any row carrying a duration are absent, not zero.
pub fn duration_by_review_score(table: &OrderTable) -> Vec<ReviewDuration> {
    let mut groups: BTreeMap<u8, (f64, usize)> = BTreeMap::new();

    for row in table {
        if let (Some(score), Some(duration)) = (row.review_score, row.delivery_duration) {
            let entry = groups.entry(score).or_insert((0.0, 0));
            entry.0 += duration;
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(review_score, (sum, count))| ReviewDuration {
            review_score,
            mean_delivery_duration: sum / count as f64,
        })
        .collect()
}

/// Per-row `(review_score, delivery_duration)` pairs, in table order.
pub fn review_duration_points(table: &OrderTable) -> Vec<ReviewDurationPoint> {
    table
        .iter()
        .filter_map(|r| {
            Some(ReviewDurationPoint {
                review_score: r.review_score?,
                delivery_duration: r.delivery_duration?,
            })
        })
        .collect()
}
