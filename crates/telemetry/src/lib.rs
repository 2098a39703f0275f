//! Internal telemetry for the order analytics dashboard.
//!
//! Metrics are kept in-process and exposed through the health endpoint;
//! logs go through `tracing`.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;
