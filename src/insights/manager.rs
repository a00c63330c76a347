// Insights Manager - the data operations offered to the presentation layer
use crate::{
    config::PulseConfig,
    connectors::{GitHubConnector, StatsSource, TimedSource},
    context::*,
    errors::PulseResult,
    window::TimeRange,
};
use std::sync::Arc;
use std::time::Duration;

use super::{consolidate, discovery, stats, ConsolidateOptions};

pub struct InsightsManager {
    source: Arc<dyn StatsSource>,
    config: PulseConfig,
}

impl InsightsManager {
    /// Wrap `source` so that every upstream call is bounded by the configured timeout.
    pub fn new(source: Arc<dyn StatsSource>, config: PulseConfig) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        Self {
            source: Arc::new(TimedSource::new(source, timeout)),
            config,
        }
    }

    pub fn from_config(config: PulseConfig) -> PulseResult<Self> {
        let github = GitHubConnector::from_config(&config)?;
        Ok(Self::new(Arc::new(github), config))
    }

    pub fn source_id(&self) -> &'static str {
        self.source.id()
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    fn consolidate_options(&self) -> ConsolidateOptions {
        ConsolidateOptions {
            fan_out_limit: self.config.fan_out_limit,
            contributor_limit: self.config.contributor_limit,
            top_contributors: self.config.top_contributors,
        }
    }

    /// Deduplicated repositories from all discovery queries, most-starred first.
    pub async fn discover_repositories(&self) -> Vec<RepositorySummary> {
        discovery::discover_repositories(self.source.as_ref(), &self.config.discovery_queries()).await
    }

    pub async fn repo_stats(&self, full_name: &str, range: TimeRange) -> PulseResult<RepoStatsBundle> {
        stats::fetch_repo_stats(
            self.source.as_ref(),
            full_name,
            &range.resolve(),
            self.config.contributor_limit,
        )
        .await
    }

    pub async fn repo_commits(&self, full_name: &str, range: TimeRange) -> PulseResult<Vec<CommitRecord>> {
        stats::fetch_repo_commits(self.source.as_ref(), full_name, &range.resolve()).await
    }

    pub async fn repo_detail(&self, full_name: &str, range: TimeRange) -> PulseResult<RepoDetail> {
        stats::fetch_repo_detail(
            self.source.as_ref(),
            full_name,
            &range.resolve(),
            self.config.contributor_limit,
        )
        .await
    }

    pub async fn consolidated(
        &self,
        repositories: &[RepositorySummary],
        range: TimeRange,
    ) -> PulseResult<ConsolidatedBundle> {
        consolidate::fetch_consolidated(
            self.source.as_ref(),
            repositories,
            &range.resolve(),
            self.consolidate_options(),
        )
        .await
    }
}
