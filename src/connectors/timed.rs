// Timed Source - per-call deadline around any StatsSource
use super::StatsSource;
use crate::{
    context::*,
    errors::{PulseError, PulseResult},
};

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Bounds every upstream call so one hanging request cannot stall a fan-out barrier.
pub struct TimedSource {
    inner: Arc<dyn StatsSource>,
    timeout: Duration,
}

impl TimedSource {
    pub fn new(inner: Arc<dyn StatsSource>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T, F>(&self, endpoint: String, call: F) -> PulseResult<T>
    where
        F: Future<Output = PulseResult<T>> + Send,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(PulseError::Timeout {
                endpoint,
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl StatsSource for TimedSource {
    fn id(&self) -> &'static str {
        self.inner.id()
    }

    async fn search_repositories(&self, query: &str) -> PulseResult<Vec<RepositorySummary>> {
        self.bounded(format!("search:{}", query), self.inner.search_repositories(query))
            .await
    }

    async fn contributors(&self, full_name: &str, limit: u32) -> PulseResult<Vec<ContributionRecord>> {
        self.bounded(format!("contributors:{}", full_name), self.inner.contributors(full_name, limit))
            .await
    }

    async fn commit_activity(&self, full_name: &str) -> PulseResult<Vec<WeeklyActivityPoint>> {
        self.bounded(format!("commit_activity:{}", full_name), self.inner.commit_activity(full_name))
            .await
    }

    async fn pull_requests(&self, full_name: &str, since_date: &str) -> PulseResult<Vec<TrackedItem>> {
        self.bounded(format!("pulls:{}", full_name), self.inner.pull_requests(full_name, since_date))
            .await
    }

    async fn issues(&self, full_name: &str, since_date: &str) -> PulseResult<Vec<TrackedItem>> {
        self.bounded(format!("issues:{}", full_name), self.inner.issues(full_name, since_date))
            .await
    }

    async fn commits(&self, full_name: &str, since: &str) -> PulseResult<Vec<CommitRecord>> {
        self.bounded(format!("commits:{}", full_name), self.inner.commits(full_name, since))
            .await
    }
}
