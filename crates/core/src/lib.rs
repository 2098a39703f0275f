//! Core types, schema, and errors for the order analytics dashboard.

pub mod error;
pub mod limits;
pub mod range;
pub mod records;
pub mod schema;

pub use error::{Error, Result};
pub use range::*;
pub use records::*;
