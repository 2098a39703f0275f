//! Application state shared across handlers.

use dashboard_core::DateRange;
use parking_lot::RwLock;
use pipeline::Dashboard;
use std::sync::Arc;
use tracing::debug;

/// Shared state: the read-only dashboard plus the session's filter.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
    /// Category count used when a request does not ask for one
    pub default_top_n: usize,
    /// Last range that produced a successful render
    current_range: Arc<RwLock<Option<DateRange>>>,
}

impl AppState {
    pub fn new(dashboard: Dashboard, default_top_n: usize) -> Self {
        Self {
            dashboard,
            default_top_n,
            current_range: Arc::new(RwLock::new(None)),
        }
    }

    pub fn current_range(&self) -> Option<DateRange> {
        *self.current_range.read()
    }

    /// Records the range of a successful render.
    pub fn set_current_range(&self, range: Option<DateRange>) {
        debug!(range = ?range, "Session filter updated");
        *self.current_range.write() = range;
    }
}
