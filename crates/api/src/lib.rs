//! HTTP presentation adapter: serves pipeline output as JSON to the
//! browser dashboard.

pub mod query;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
