//! Order-line record loader: fetches a CSV dataset, parses it into typed
//! rows, and orders them by delivery date.

pub mod config;
pub mod loader;
pub mod parse;
pub mod source;

pub use config::*;
pub use loader::*;
pub use parse::parse_records;
pub use source::*;
