mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::*;
use pretty_assertions::assert_eq;
use pulse_service::connectors::MockEndpoint;
use pulse_service::context::*;
use pulse_service::{PulseError, TimeRange};

fn logins(records: &[ContributionRecord]) -> Vec<(&str, u64)> {
    records.iter().map(|c| (c.login.as_str(), c.contributions)).collect()
}

#[tokio::test]
async fn discovery_merges_all_three_queries() {
    let mock = scripted_org();
    let manager = manager_for(mock.clone());

    let repos = manager.discover_repositories().await;
    let names: Vec<&str> = repos.iter().map(|r| r.full_name()).collect();
    assert_eq!(names, vec!["bnbchain/bsc", "bnbchain/node", "binance-chain/tss-lib"]);
    assert_eq!(mock.call_count("search:"), 3);
}

#[tokio::test]
async fn discovery_is_idempotent() {
    let manager = manager_for(scripted_org());
    let first = manager.discover_repositories().await;
    let second = manager.discover_repositories().await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn consolidated_rollup_matches_scripted_org() {
    let manager = manager_for(scripted_org());
    let repos = manager.discover_repositories().await;

    let bundle = manager.consolidated(&repos, TimeRange::Month).await.unwrap();

    assert_eq!(bundle.total_repos, 3);
    assert_eq!(bundle.total_stars, 4130);
    assert_eq!(bundle.total_forks, 1420);
    assert_eq!(bundle.total_commits, 17);
    assert_eq!(
        bundle.commit_activity,
        vec![
            WeeklyActivityPoint::rollup(1_709_424_000, 7),
            WeeklyActivityPoint::rollup(1_710_028_800, 10),
        ]
    );
    assert_eq!(bundle.pull_requests, StatusCounts::new(1, 2));
    assert_eq!(bundle.issues, StatusCounts::new(1, 1));
    assert_eq!(logins(&bundle.top_contributors), vec![("alice", 16), ("carol", 9), ("bob", 4)]);
}

#[tokio::test(start_paused = true)]
async fn hanging_repository_is_cut_off_by_timeout() {
    let mock = scripted_org();
    mock.set_delay("bnbchain/node", Duration::from_secs(120));
    let manager = manager_for(mock);
    let repos = manager.discover_repositories().await;

    let bundle = manager.consolidated(&repos, TimeRange::Week).await.unwrap();

    assert_eq!(bundle.total_commits, 8);
    assert_eq!(logins(&bundle.top_contributors), vec![("alice", 10), ("bob", 4)]);
    assert_eq!(bundle.total_repos, 3);
}

#[tokio::test]
async fn repo_stats_bundle_is_all_or_nothing() {
    let mock = scripted_org();
    let manager = manager_for(mock.clone());

    let bundle = manager.repo_stats("bnbchain/bsc", TimeRange::Week).await.unwrap();
    assert_eq!(bundle.pull_requests, StatusCounts::new(1, 1));
    assert_eq!(bundle.issues, StatusCounts::new(1, 1));
    assert_eq!(bundle.commit_activity[0].days, [0, 1, 1, 1, 1, 1, 0]);

    mock.fail(MockEndpoint::Issues, "bnbchain/bsc", 422);
    let err = manager.repo_stats("bnbchain/bsc", TimeRange::Week).await.unwrap_err();
    assert!(matches!(err, PulseError::Aggregate(_)));
}

#[tokio::test]
async fn repo_commits_are_listed_for_window() {
    let mock = scripted_org();
    let manager = manager_for(mock.clone());

    let commits = manager.repo_commits("bnbchain/bsc", TimeRange::Day).await.unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message, "Fix block validation");
    assert_eq!(mock.call_count("commits:bnbchain/bsc?since="), 1);
}

#[tokio::test]
async fn invalid_repository_names_never_reach_the_source() {
    let mock = scripted_org();
    let manager = manager_for(mock.clone());

    let err = manager.repo_stats("not-a-repo", TimeRange::Week).await.unwrap_err();
    assert!(matches!(err, PulseError::InvalidArguments(_)));
    assert_eq!(mock.call_count("contributors:"), 0);
}

#[tokio::test]
async fn session_loads_repositories_and_rollup() {
    let session = DashboardSession::new(manager_for(scripted_org()));
    session.load_repositories().await;

    let state = session.snapshot();
    assert!(!state.loading);
    assert_eq!(state.repositories.len(), 3);
    assert_eq!(state.consolidated.as_ref().map(|c| c.total_commits), Some(17));
    assert!(!state.fetching_consolidated);
}

#[tokio::test]
async fn session_reports_unknown_selection() {
    let session = DashboardSession::new(manager_for(scripted_org()));
    session.load_repositories().await;

    let err = session.select_repository(Some("someone/else")).await.unwrap_err();
    assert!(matches!(err, PulseError::NotFound(_)));
    assert!(session.snapshot().selected.is_none());
}

#[tokio::test]
async fn session_records_failed_detail() {
    let mock = scripted_org();
    let session = DashboardSession::new(manager_for(mock));
    session.load_repositories().await;

    session.select_repository(Some("binance-chain/tss-lib")).await.unwrap();
    let state = session.snapshot();
    assert!(state.detail.is_none());
    assert!(state.detail_error.is_some());
    assert!(!state.fetching_details);
}

#[tokio::test(start_paused = true)]
async fn late_detail_for_previous_selection_is_discarded() {
    let mock = scripted_org();
    let session = Arc::new(DashboardSession::new(manager_for(mock.clone())));
    session.load_repositories().await;
    mock.set_delay("bnbchain/bsc", Duration::from_secs(5));

    let slow = session.select_repository(Some("bnbchain/bsc"));
    let fast = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        session.select_repository(Some("bnbchain/node")).await
    };
    let (slow, fast) = tokio::join!(slow, fast);
    slow.unwrap();
    fast.unwrap();

    let state = session.snapshot();
    assert_eq!(state.selected_name(), Some("bnbchain/node"));
    let detail = state.detail.expect("node detail applied");
    assert_eq!(logins(&detail.stats.contributors), vec![("alice", 6), ("carol", 9)]);
    assert!(detail.commits.is_empty());
}

#[tokio::test]
async fn range_change_reloads_dependent_data() {
    let mock = scripted_org();
    let session = DashboardSession::new(manager_for(mock.clone()));
    session.load_repositories().await;
    session.select_repository(Some("bnbchain/bsc")).await.unwrap();

    let before = mock.call_count("pulls:bnbchain/bsc");
    session.set_time_range(TimeRange::Quarter).await;

    let state = session.snapshot();
    assert_eq!(state.time_range, TimeRange::Quarter);
    // once for the rollup, once for the detail
    assert_eq!(mock.call_count("pulls:bnbchain/bsc") - before, 2);
    assert!(state.detail.is_some());
    assert!(state.consolidated.is_some());
}

#[tokio::test]
async fn empty_refresh_clears_rollup_and_selection() {
    let mock = scripted_org();
    let session = DashboardSession::new(manager_for(mock.clone()));
    session.load_repositories().await;
    session.select_repository(Some("bnbchain/bsc")).await.unwrap();
    assert!(session.snapshot().consolidated.is_some());

    for query in ["topic:bnb-chain", "org:bnbchain", "org:binance-chain"] {
        mock.fail_search(query, 403);
    }
    session.refresh().await;

    let state = session.snapshot();
    assert!(state.repositories.is_empty());
    assert!(state.error.is_some());
    assert!(state.consolidated.is_none());
    assert!(state.selected.is_none());
    assert!(state.detail.is_none());
}
