//! Contract between the pipeline and whatever renders its output.
//!
//! The pipeline emits raw numbers only. Currency and number formatting,
//! charts, and layout belong to the view.

use dashboard_core::{DateBounds, DateRange, Error};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregate::{
    KpiSummary, MetricMean, ReviewDuration, ReviewDurationPoint, TopCategories,
};

/// Every aggregation computed from one filtered snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    /// `None` when the filtered table is empty.
    pub kpis: Option<KpiSummary>,
    pub top_categories: TopCategories,
    pub metric_means: Vec<MetricMean>,
    pub duration_by_review_score: Vec<ReviewDuration>,
    pub review_points: Vec<ReviewDurationPoint>,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub run_id: Uuid,
    /// Filter that produced this snapshot, `None` for the full table.
    pub range: Option<DateRange>,
    /// Delivery-date extremes of the base table, for the date picker.
    pub bounds: Option<DateBounds>,
    /// Rows left after filtering.
    pub record_count: usize,
    /// True when the filter left nothing to summarize.
    pub empty: bool,
    #[serde(flatten)]
    pub aggregates: Aggregates,
}

/// A consumer of pipeline output.
pub trait DashboardView {
    fn render(&mut self, snapshot: &DashboardSnapshot);

    /// Called for recoverable per-run failures; the previous render stays.
    fn render_error(&mut self, error: &Error);
}

/// View that writes a one-line summary of each snapshot to the log.
#[derive(Debug, Default)]
pub struct LogView;

impl DashboardView for LogView {
    fn render(&mut self, snapshot: &DashboardSnapshot) {
        let Some(kpis) = &snapshot.aggregates.kpis else {
            info!(run_id = %snapshot.run_id, "Dashboard is empty for the selected range");
            return;
        };

        let top = snapshot
            .aggregates
            .top_categories
            .categories
            .first()
            .map(|c| c.category.as_str())
            .unwrap_or("-");

        info!(
            run_id = %snapshot.run_id,
            records = snapshot.record_count,
            total_revenue = %kpis.total_revenue,
            total_orders = kpis.total_orders,
            total_customers = kpis.total_customers,
            avg_delivery_days = ?kpis.avg_delivery_duration,
            avg_review_score = ?kpis.avg_review_score,
            top_category = top,
            "Dashboard rendered"
        );
    }

    fn render_error(&mut self, error: &Error) {
        warn!(code = error.error_code(), error = %error, "Dashboard run failed");
    }
}
