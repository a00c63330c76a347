// Insights Module - discovery, per-repository stats and consolidated rollups
pub mod consolidate;
pub mod discovery;
pub mod manager;
pub mod stats;

pub use consolidate::{ConsolidateOptions, RepoSlices};
pub use manager::InsightsManager;
