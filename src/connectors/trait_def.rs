// Source Trait - Read-only view of the upstream hosting platform
use crate::{context::*, errors::PulseResult};
use async_trait::async_trait;

/// Every method is a single-shot call: a non-2xx answer is an error, no retries.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Source identifier (github, mock, ...)
    fn id(&self) -> &'static str;

    /// Repository search by query string (`topic:x`, `org:y`)
    async fn search_repositories(&self, query: &str) -> PulseResult<Vec<RepositorySummary>>;

    /// Top contributors, already ordered by contribution count descending
    async fn contributors(&self, full_name: &str, limit: u32) -> PulseResult<Vec<ContributionRecord>>;

    /// Trailing weekly commit series; independent of any date filter
    async fn commit_activity(&self, full_name: &str) -> PulseResult<Vec<WeeklyActivityPoint>>;

    /// Pull requests updated or created since `since_date` (`YYYY-MM-DD`)
    async fn pull_requests(&self, full_name: &str, since_date: &str) -> PulseResult<Vec<TrackedItem>>;

    /// Issues updated or created since `since_date`; may include pull requests
    async fn issues(&self, full_name: &str, since_date: &str) -> PulseResult<Vec<TrackedItem>>;

    /// Commits since `since` (RFC 3339)
    async fn commits(&self, full_name: &str, since: &str) -> PulseResult<Vec<CommitRecord>>;
}
