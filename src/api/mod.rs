//! REST API endpoints for the browser dashboard
//!
//! Plain JSON over HTTP; rendering stays in the browser.

pub mod dashboard;

pub use dashboard::{dashboard_routes, AppState, RangeQuery};
