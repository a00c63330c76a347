// Pulse Service - activity metrics for an organization's repositories
// Discovers repositories, fetches per-repository statistics and rolls them up
// for a browser dashboard over selectable time windows

pub mod api;
pub mod config;
pub mod connectors;
pub mod context;
pub mod errors;
pub mod insights;
pub mod window;

pub use config::PulseConfig;
pub use errors::{PulseError, PulseResult};
pub use insights::InsightsManager;
pub use window::{TimeRange, TimeWindow};
