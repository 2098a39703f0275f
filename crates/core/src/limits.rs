//! Defaults and value bounds for the dashboard pipeline.
//!
//! Field bounds are enforced at load time by the record parser; the
//! aggregation defaults are used when the caller does not supply one.

// === Aggregation Defaults ===

/// Number of categories returned by the revenue ranking.
pub const DEFAULT_TOP_N: usize = 10;

// === Field Bounds ===

/// Lowest valid review score.
pub const REVIEW_SCORE_MIN: u8 = 1;

/// Highest valid review score.
pub const REVIEW_SCORE_MAX: u8 = 5;

/// Largest accepted `price` or `freight_value`. Keeps revenue sums far from
/// the decimal overflow point.
pub const MAX_CURRENCY_AMOUNT: i64 = 1_000_000_000_000;
