// Upstream connectors - where repository data comes from
pub mod trait_def;
pub mod github;
pub mod mock;
pub mod timed;

pub use trait_def::StatsSource;
pub use github::GitHubConnector;
pub use mock::{MockEndpoint, MockSource};
pub use timed::TimedSource;
