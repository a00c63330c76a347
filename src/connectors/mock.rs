// Mock Stats Source - scripted upstream answers for tests
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::StatsSource;
use crate::{
    context::*,
    errors::{PulseError, PulseResult},
};

/// Endpoint families a [`MockSource`] can script per repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockEndpoint {
    Contributors,
    CommitActivity,
    PullRequests,
    Issues,
    Commits,
}

impl MockEndpoint {
    fn name(&self) -> &'static str {
        match self {
            MockEndpoint::Contributors => "contributors",
            MockEndpoint::CommitActivity => "stats/commit_activity",
            MockEndpoint::PullRequests => "pulls",
            MockEndpoint::Issues => "issues",
            MockEndpoint::Commits => "commits",
        }
    }
}

type Reply<T> = Result<T, u16>;

/// Test source returning scripted responses.
///
/// Anything not scripted answers 404, so a test only sets up what it reads.
#[derive(Default)]
pub struct MockSource {
    searches: Mutex<HashMap<String, Reply<Vec<RepositorySummary>>>>,
    contributors: Mutex<HashMap<String, Reply<Vec<ContributionRecord>>>>,
    activity: Mutex<HashMap<String, Reply<Vec<WeeklyActivityPoint>>>>,
    pulls: Mutex<HashMap<String, Reply<Vec<TrackedItem>>>>,
    issues: Mutex<HashMap<String, Reply<Vec<TrackedItem>>>>,
    commits: Mutex<HashMap<String, Reply<Vec<CommitRecord>>>>,
    /// key: repository full name or search query
    delays: Mutex<HashMap<String, Duration>>,
    /// every call as "{endpoint}:{key}" or "{endpoint}:{key}?since={since}"
    pub calls: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&self, query: &str, repos: Vec<RepositorySummary>) {
        self.searches.lock().insert(query.to_string(), Ok(repos));
    }

    pub fn fail_search(&self, query: &str, status: u16) {
        self.searches.lock().insert(query.to_string(), Err(status));
    }

    pub fn set_contributors(&self, full_name: &str, records: Vec<ContributionRecord>) {
        self.contributors.lock().insert(full_name.to_string(), Ok(records));
    }

    pub fn set_activity(&self, full_name: &str, weeks: Vec<WeeklyActivityPoint>) {
        self.activity.lock().insert(full_name.to_string(), Ok(weeks));
    }

    pub fn set_pull_requests(&self, full_name: &str, items: Vec<TrackedItem>) {
        self.pulls.lock().insert(full_name.to_string(), Ok(items));
    }

    pub fn set_issues(&self, full_name: &str, items: Vec<TrackedItem>) {
        self.issues.lock().insert(full_name.to_string(), Ok(items));
    }

    pub fn set_commits(&self, full_name: &str, commits: Vec<CommitRecord>) {
        self.commits.lock().insert(full_name.to_string(), Ok(commits));
    }

    /// Script an empty-but-successful answer on all four stats endpoints.
    pub fn set_empty_stats(&self, full_name: &str) {
        self.set_contributors(full_name, Vec::new());
        self.set_activity(full_name, Vec::new());
        self.set_pull_requests(full_name, Vec::new());
        self.set_issues(full_name, Vec::new());
    }

    pub fn fail(&self, endpoint: MockEndpoint, full_name: &str, status: u16) {
        let key = full_name.to_string();
        match endpoint {
            MockEndpoint::Contributors => {
                self.contributors.lock().insert(key, Err(status));
            }
            MockEndpoint::CommitActivity => {
                self.activity.lock().insert(key, Err(status));
            }
            MockEndpoint::PullRequests => {
                self.pulls.lock().insert(key, Err(status));
            }
            MockEndpoint::Issues => {
                self.issues.lock().insert(key, Err(status));
            }
            MockEndpoint::Commits => {
                self.commits.lock().insert(key, Err(status));
            }
        }
    }

    /// Delay every answer for `key` (a repository full name or a search query).
    pub fn set_delay(&self, key: &str, delay: Duration) {
        self.delays.lock().insert(key.to_string(), delay);
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.starts_with(prefix)).count()
    }

    async fn answer<T: Clone>(
        &self,
        table: &Mutex<HashMap<String, Reply<T>>>,
        endpoint: &str,
        key: &str,
        call: String,
    ) -> PulseResult<T> {
        self.calls.lock().push(call);

        let delay = self.delays.lock().get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = table.lock().get(key).cloned();
        match reply {
            Some(Ok(value)) => Ok(value),
            Some(Err(status)) => Err(PulseError::Transport {
                status,
                endpoint: format!("{}:{}", endpoint, key),
            }),
            None => Err(PulseError::Transport {
                status: 404,
                endpoint: format!("{}:{}", endpoint, key),
            }),
        }
    }
}

#[async_trait]
impl StatsSource for MockSource {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn search_repositories(&self, query: &str) -> PulseResult<Vec<RepositorySummary>> {
        self.answer(&self.searches, "search", query, format!("search:{}", query))
            .await
    }

    async fn contributors(&self, full_name: &str, _limit: u32) -> PulseResult<Vec<ContributionRecord>> {
        let name = MockEndpoint::Contributors.name();
        self.answer(&self.contributors, name, full_name, format!("{}:{}", name, full_name))
            .await
    }

    async fn commit_activity(&self, full_name: &str) -> PulseResult<Vec<WeeklyActivityPoint>> {
        let name = MockEndpoint::CommitActivity.name();
        self.answer(&self.activity, name, full_name, format!("{}:{}", name, full_name))
            .await
    }

    async fn pull_requests(&self, full_name: &str, since_date: &str) -> PulseResult<Vec<TrackedItem>> {
        let name = MockEndpoint::PullRequests.name();
        let call = format!("{}:{}?since={}", name, full_name, since_date);
        self.answer(&self.pulls, name, full_name, call).await
    }

    async fn issues(&self, full_name: &str, since_date: &str) -> PulseResult<Vec<TrackedItem>> {
        let name = MockEndpoint::Issues.name();
        let call = format!("{}:{}?since={}", name, full_name, since_date);
        self.answer(&self.issues, name, full_name, call).await
    }

    async fn commits(&self, full_name: &str, since: &str) -> PulseResult<Vec<CommitRecord>> {
        let name = MockEndpoint::Commits.name();
        let call = format!("{}:{}?since={}", name, full_name, since);
        self.answer(&self.commits, name, full_name, call).await
    }
}
