// Per-Repository Stats - all-or-nothing bundle for one repository
use crate::{
    connectors::StatsSource,
    context::*,
    errors::{PulseError, PulseResult},
    window::TimeWindow,
};
use tracing::{error, info};

/// Reject anything that is not `owner/name` before it reaches a URL.
pub fn validate_full_name(full_name: &str) -> PulseResult<()> {
    let mut parts = full_name.split('/');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
    );
    if valid {
        Ok(())
    } else {
        Err(PulseError::InvalidArguments(format!(
            "repository must be 'owner/name': {:?}",
            full_name
        )))
    }
}

pub fn count_pull_requests(items: &[TrackedItem]) -> StatusCounts {
    tally(items.iter())
}

/// Issue counts, skipping rows that are really pull requests.
pub fn count_issues(items: &[TrackedItem]) -> StatusCounts {
    tally(items.iter().filter(|i| !i.is_pull_request))
}

fn tally<'a>(items: impl Iterator<Item = &'a TrackedItem>) -> StatusCounts {
    items.fold(StatusCounts::default(), |mut counts, item| {
        match item.state {
            ItemState::Open => counts.open += 1,
            ItemState::Closed => counts.closed += 1,
        }
        counts
    })
}

/// Fetch contributors, commit activity, pull requests and issues for one repository.
///
/// The four calls run concurrently. If any of them fails the whole bundle
/// fails: a detail view needs a consistent bundle or none.
pub async fn fetch_repo_stats(
    source: &dyn StatsSource,
    full_name: &str,
    window: &TimeWindow,
    contributor_limit: u32,
) -> PulseResult<RepoStatsBundle> {
    validate_full_name(full_name)?;
    let since = window.since_date();

    let fetched = futures::try_join!(
        source.contributors(full_name, contributor_limit),
        source.commit_activity(full_name),
        source.pull_requests(full_name, &since),
        source.issues(full_name, &since),
    );

    let (contributors, commit_activity, pulls, issues) = fetched.map_err(|e| {
        error!(repo = full_name, error = %e, "Repository stats fetch failed");
        PulseError::Aggregate(format!("stats for {} unavailable: {}", full_name, e))
    })?;

    let bundle = RepoStatsBundle {
        contributors,
        commit_activity,
        pull_requests: count_pull_requests(&pulls),
        issues: count_issues(&issues),
    };

    info!(
        repo = full_name,
        since = %since,
        contributors = bundle.contributors.len(),
        weeks = bundle.commit_activity.len(),
        prs = bundle.pull_requests.total(),
        issues = bundle.issues.total(),
        "Repository stats fetched"
    );
    Ok(bundle)
}

/// Commits made since the window start.
pub async fn fetch_repo_commits(
    source: &dyn StatsSource,
    full_name: &str,
    window: &TimeWindow,
) -> PulseResult<Vec<CommitRecord>> {
    validate_full_name(full_name)?;
    let commits = source.commits(full_name, &window.since_timestamp()).await?;
    info!(repo = full_name, commits = commits.len(), "Repository commits fetched");
    Ok(commits)
}

/// Stats bundle and commit list together; either failing fails the detail.
pub async fn fetch_repo_detail(
    source: &dyn StatsSource,
    full_name: &str,
    window: &TimeWindow,
    contributor_limit: u32,
) -> PulseResult<RepoDetail> {
    let (stats, commits) = futures::try_join!(
        fetch_repo_stats(source, full_name, window, contributor_limit),
        fetch_repo_commits(source, full_name, window),
    )?;
    Ok(RepoDetail { stats, commits })
}
