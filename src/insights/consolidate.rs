//! Consolidated Aggregator - organization-wide rollup across repositories.
//!
//! ## Populations
//!
//! Two populations feed one [`ConsolidatedBundle`]:
//! - **Full list**: repository count, star total and fork total are summed over
//!   every repository passed in.
//! - **Fan-out subset**: commit activity, pull request and issue counts and the
//!   contributor ranking only cover the most-starred `fan_out_limit`
//!   repositories, which bounds the number of upstream calls.
//!
//! The two figures therefore do not describe the same set of repositories.
//!
//! ## Failure isolation
//!
//! Each slice of each repository is isolated: a failed contributor fetch for one
//! repository empties that slice only. The rollup itself fails only when there is
//! nothing to roll up.

use crate::{
    connectors::StatsSource,
    context::*,
    errors::{PulseError, PulseResult},
    window::TimeWindow,
};
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

use super::stats::{count_issues, count_pull_requests};

/// Bounds applied to one consolidation run
#[derive(Debug, Clone, Copy)]
pub struct ConsolidateOptions {
    pub fan_out_limit: usize,
    pub contributor_limit: u32,
    pub top_contributors: usize,
}

impl Default for ConsolidateOptions {
    fn default() -> Self {
        Self {
            fan_out_limit: 10,
            contributor_limit: 10,
            top_contributors: 10,
        }
    }
}

/// What one repository contributed; failed slices are empty
#[derive(Debug, Clone, Default)]
pub struct RepoSlices {
    pub full_name: String,
    pub contributors: Vec<ContributionRecord>,
    pub commit_activity: Vec<WeeklyActivityPoint>,
    pub pull_requests: StatusCounts,
    pub issues: StatusCounts,
}

/// The `limit` most-starred repositories, in star order.
pub fn select_fan_out(repositories: &[RepositorySummary], limit: usize) -> Vec<&RepositorySummary> {
    let mut ranked: Vec<&RepositorySummary> = repositories.iter().collect();
    ranked.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    ranked.truncate(limit);
    ranked
}

pub async fn fetch_consolidated(
    source: &dyn StatsSource,
    repositories: &[RepositorySummary],
    window: &TimeWindow,
    options: ConsolidateOptions,
) -> PulseResult<ConsolidatedBundle> {
    if repositories.is_empty() {
        return Err(PulseError::Aggregate(
            "no repositories to consolidate".to_string(),
        ));
    }

    let since = window.since_date();
    let fan_out = select_fan_out(repositories, options.fan_out_limit);

    // Single barrier: folding starts once every repository has settled
    let slices = join_all(
        fan_out
            .iter()
            .map(|repo| fetch_slices(source, repo.full_name(), &since, options.contributor_limit)),
    )
    .await;

    let bundle = fold_consolidated(repositories, &slices, options.top_contributors);

    info!(
        repositories = bundle.total_repos,
        fan_out = slices.len(),
        since = %since,
        commits = bundle.total_commits,
        contributors = bundle.top_contributors.len(),
        "Consolidated stats computed"
    );
    Ok(bundle)
}

async fn fetch_slices(source: &dyn StatsSource, full_name: &str, since: &str, contributor_limit: u32) -> RepoSlices {
    let (contributors, activity, pulls, issues) = tokio::join!(
        source.contributors(full_name, contributor_limit),
        source.commit_activity(full_name),
        source.pull_requests(full_name, since),
        source.issues(full_name, since),
    );

    RepoSlices {
        full_name: full_name.to_string(),
        contributors: absorb(contributors, full_name, "contributors"),
        commit_activity: absorb(activity, full_name, "commit_activity"),
        pull_requests: count_pull_requests(&absorb(pulls, full_name, "pulls")),
        issues: count_issues(&absorb(issues, full_name, "issues")),
    }
}

fn absorb<T: Default>(result: PulseResult<T>, full_name: &str, slice: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!(repo = full_name, slice, error = %e, "Slice unavailable, rolling up without it");
        T::default()
    })
}

pub fn fold_consolidated(
    repositories: &[RepositorySummary],
    slices: &[RepoSlices],
    top_contributors: usize,
) -> ConsolidatedBundle {
    let commit_activity = fold_commit_activity(slices.iter().map(|s| s.commit_activity.as_slice()));
    let total_commits: u64 = commit_activity.iter().map(|w| w.total).sum();

    let mut pull_requests = StatusCounts::default();
    let mut issues = StatusCounts::default();
    for slice in slices {
        pull_requests += slice.pull_requests;
        issues += slice.issues;
    }

    ConsolidatedBundle {
        total_repos: repositories.len(),
        total_stars: repositories.iter().map(|r| r.stargazers_count).sum(),
        total_forks: repositories.iter().map(|r| r.forks_count).sum(),
        total_commits,
        pull_requests,
        issues,
        commit_activity,
        top_contributors: fold_contributors(slices.iter().map(|s| s.contributors.as_slice()), top_contributors),
    }
}

/// Sum weekly totals across series, keyed by week start, ascending.
pub fn fold_commit_activity<'a, I>(series: I) -> Vec<WeeklyActivityPoint>
where
    I: IntoIterator<Item = &'a [WeeklyActivityPoint]>,
{
    let mut weeks: BTreeMap<i64, u64> = BTreeMap::new();
    for point in series.into_iter().flatten() {
        *weeks.entry(point.week).or_insert(0) += point.total;
    }

    weeks
        .into_iter()
        .map(|(week, total)| WeeklyActivityPoint::rollup(week, total))
        .collect()
}

/// Merge contributors by login, summing contributions, and keep the top `limit`.
///
/// Avatar and profile URL come from the first sighting of a login. Ties keep
/// first-sighting order.
pub fn fold_contributors<'a, I>(lists: I, limit: usize) -> Vec<ContributionRecord>
where
    I: IntoIterator<Item = &'a [ContributionRecord]>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut merged: Vec<ContributionRecord> = Vec::new();

    for record in lists.into_iter().flatten() {
        match slots.get(record.login.as_str()) {
            Some(&slot) => merged[slot].contributions += record.contributions,
            None => {
                slots.insert(record.login.as_str(), merged.len());
                merged.push(record.clone());
            }
        }
    }

    merged.sort_by(|a, b| b.contributions.cmp(&a.contributions));
    merged.truncate(limit);
    merged
}
