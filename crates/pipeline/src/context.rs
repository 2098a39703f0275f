//! Per-run pipeline context.
//!
//! `Dashboard` owns the immutable base table for the life of the process;
//! every render builds a fresh `PipelineRun` against it.

use std::sync::Arc;
use std::time::Instant;

use dashboard_core::limits::DEFAULT_TOP_N;
use dashboard_core::{DateRange, Error, OrderTable, RawTable, Result};
use record_loader::{load_records, RecordSource};
use telemetry::metrics;
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::aggregate::{
    duration_by_review_score, kpi_summary, metric_means, review_duration_points, top_categories,
};
use crate::derive::derive_revenue;
use crate::filter::filter_by_delivery;
use crate::presentation::{Aggregates, DashboardSnapshot};

/// The loaded and derived dataset.
#[derive(Debug, Clone)]
pub struct Dashboard {
    base: Arc<OrderTable>,
}

impl Dashboard {
    /// Loads the dataset and derives the base table.
    pub async fn bootstrap(source: &dyn RecordSource) -> Result<Self> {
        let raw = load_records(source).await?;
        Ok(Self::from_raw(&raw))
    }

    pub fn from_raw(raw: &RawTable) -> Self {
        let base = derive_revenue(raw);
        info!(rows = base.len(), "Base table ready");
        Self {
            base: Arc::new(base),
        }
    }

    pub fn base(&self) -> &Arc<OrderTable> {
        &self.base
    }

    /// Runs the pipeline for one render.
    pub fn run(&self, range: Option<DateRange>, top_n: usize) -> Result<DashboardSnapshot> {
        PipelineRun::new(Arc::clone(&self.base), range)
            .with_top_n(top_n)
            .execute()
    }
}

/// One filter-then-aggregate pass over the base table.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    run_id: Uuid,
    base: Arc<OrderTable>,
    range: Option<DateRange>,
    top_n: usize,
}

impl PipelineRun {
    pub fn new(base: Arc<OrderTable>, range: Option<DateRange>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            base,
            range,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Filters once, then computes every aggregation from that snapshot.
    pub fn execute(&self) -> Result<DashboardSnapshot> {
        let span = info_span!("pipeline_run", run_id = %self.run_id);
        let _guard = span.enter();
        let start = Instant::now();

        metrics().pipeline_runs.inc();

        let filtered = filter_by_delivery(&self.base, self.range.as_ref());

        let kpis = match kpi_summary(&filtered) {
            Ok(kpis) => Some(kpis),
            Err(Error::NoData(reason)) => {
                metrics().empty_results.inc();
                debug!(reason = %reason, "No rows to summarize");
                None
            }
            Err(e) => return Err(e),
        };

        let aggregates = Aggregates {
            kpis,
            top_categories: top_categories(&filtered, self.top_n)?,
            metric_means: metric_means(&filtered),
            duration_by_review_score: duration_by_review_score(&filtered),
            review_points: review_duration_points(&filtered),
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        metrics().pipeline_latency_ms.observe(latency_ms);
        debug!(
            records = filtered.len(),
            latency_ms = latency_ms,
            "Pipeline run complete"
        );

        Ok(DashboardSnapshot {
            run_id: self.run_id,
            range: self.range,
            bounds: self.base.date_bounds(),
            record_count: filtered.len(),
            empty: aggregates.kpis.is_none(),
            aggregates,
        })
    }
}
