//! Transformation pipeline of the order analytics dashboard.
//!
//! Loader → Derivation → Filter → Aggregation → Presentation. Every stage
//! takes a table by reference and returns a new value.

pub mod aggregate;
pub mod context;
pub mod derive;
pub mod filter;
pub mod presentation;


pub use aggregate::*;
pub use context::*;
pub use derive::derive_revenue;
pub use filter::filter_by_delivery;
pub use presentation::*;
