// Dashboard Schema - normalized shapes handed to the presentation layer
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Repository identity - `id` is the dedup key, `full_name` the API key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    pub id: u64,
    pub owner: String,           // "bnbchain"
    pub name: String,            // "bsc"
    pub full_name: String,       // "bnbchain/bsc"
}

impl RepositoryIdentity {
    pub fn new(id: u64, owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        Self {
            id,
            full_name: format!("{}/{}", owner, name),
            owner,
            name,
        }
    }
}

/// Repository summary as returned by discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    #[serde(flatten)]
    pub identity: RepositoryIdentity,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub updated_at: DateTime<Utc>,
    pub language: Option<String>,
    pub owner_avatar_url: String,
}

impl RepositorySummary {
    pub fn id(&self) -> u64 {
        self.identity.id
    }

    pub fn full_name(&self) -> &str {
        &self.identity.full_name
    }
}

/// One contributor within a repository; `login` is the cross-repository merge key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub login: String,
    pub avatar_url: String,
    pub contributions: u64,
    pub html_url: String,
}

/// Commit totals for one week; `week` is the week-start in seconds since epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyActivityPoint {
    pub week: i64,
    pub total: u64,
    pub days: [u64; 7],          // Sunday..Saturday, zero-filled in rollups
}

impl WeeklyActivityPoint {
    pub fn rollup(week: i64, total: u64) -> Self {
        Self {
            week,
            total,
            days: [0; 7],
        }
    }
}

/// Open/closed tally used for both pull requests and issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub open: u64,
    pub closed: u64,
}

impl StatusCounts {
    pub fn new(open: u64, closed: u64) -> Self {
        Self { open, closed }
    }

    pub fn total(&self) -> u64 {
        self.open + self.closed
    }
}

impl AddAssign for StatusCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.open += rhs.open;
        self.closed += rhs.closed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Open,
    Closed,
}

/// A pull request or issue row from a window-bounded list fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub number: u64,
    pub state: ItemState,
    pub is_pull_request: bool,   // issues endpoint also returns pull requests
}

/// One repository's data for a time window
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RepoStatsBundle {
    pub contributors: Vec<ContributionRecord>,
    pub commit_activity: Vec<WeeklyActivityPoint>,
    pub pull_requests: StatusCounts,
    pub issues: StatusCounts,
}

/// Organization-wide rollup.
///
/// `total_repos`, `total_stars` and `total_forks` cover the full discovery list;
/// every other field covers only the fan-out subset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsolidatedBundle {
    pub total_repos: usize,
    pub total_stars: u64,
    pub total_forks: u64,
    pub total_commits: u64,
    pub pull_requests: StatusCounts,
    pub issues: StatusCounts,
    pub commit_activity: Vec<WeeklyActivityPoint>,
    pub top_contributors: Vec<ContributionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSignature {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

/// Commit list entry for the repository detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub message: String,
    pub author: CommitSignature,
    pub committer: CommitSignature,
    pub html_url: String,
    pub avatar_url: String,      // empty when the author has no linked account
}

/// Stats bundle and commit list fetched together for one selected repository
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RepoDetail {
    pub stats: RepoStatsBundle,
    pub commits: Vec<CommitRecord>,
}

/// Trailing `count` points of a week-ascending series, as charted.
pub fn recent_activity(series: &[WeeklyActivityPoint], count: usize) -> &[WeeklyActivityPoint] {
    let skip = series.len().saturating_sub(count);
    &series[skip..]
}
