#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pulse_service::connectors::MockSource;
use pulse_service::context::*;
use pulse_service::{InsightsManager, PulseConfig};

pub fn repo(id: u64, owner: &str, name: &str, stars: u64, forks: u64) -> RepositorySummary {
    RepositorySummary {
        identity: RepositoryIdentity::new(id, owner, name),
        description: Some(format!("{} repository", name)),
        html_url: format!("https://github.com/{}/{}", owner, name),
        stargazers_count: stars,
        forks_count: forks,
        open_issues_count: 0,
        updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        language: Some("Go".to_string()),
        owner_avatar_url: format!("https://avatars/{}", owner),
    }
}

pub fn contributor(login: &str, contributions: u64) -> ContributionRecord {
    ContributionRecord {
        login: login.to_string(),
        avatar_url: format!("https://avatars/{}", login),
        contributions,
        html_url: format!("https://github.com/{}", login),
    }
}

pub fn item(number: u64, state: ItemState, is_pull_request: bool) -> TrackedItem {
    TrackedItem {
        number,
        state,
        is_pull_request,
    }
}

pub fn commit(sha: &str, message: &str) -> CommitRecord {
    let signature = CommitSignature {
        name: "Developer One".to_string(),
        email: "dev1@example.com".to_string(),
        date: Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap(),
    };
    CommitRecord {
        sha: sha.to_string(),
        message: message.to_string(),
        author: signature.clone(),
        committer: signature,
        html_url: format!("https://github.com/bnbchain/bsc/commit/{}", sha),
        avatar_url: "https://avatars/dev1".to_string(),
    }
}

/// Organization with three repositories spread over the discovery queries.
///
/// - `bnbchain/bsc`: 2100 stars, full stats
/// - `bnbchain/node`: 1250 stars, found by two queries, full stats
/// - `binance-chain/tss-lib`: 780 stars, every stats endpoint failing
pub fn scripted_org() -> Arc<MockSource> {
    let mock = Arc::new(MockSource::new());
    let bsc = repo(1, "bnbchain", "bsc", 2100, 890);
    let node = repo(2, "bnbchain", "node", 1250, 320);
    let tss = repo(3, "binance-chain", "tss-lib", 780, 210);

    mock.set_search("topic:bnb-chain", vec![bsc.clone(), node.clone()]);
    mock.set_search("org:bnbchain", vec![node, bsc]);
    mock.set_search("org:binance-chain", vec![tss]);

    mock.set_contributors("bnbchain/bsc", vec![contributor("alice", 10), contributor("bob", 4)]);
    mock.set_activity(
        "bnbchain/bsc",
        vec![
            WeeklyActivityPoint { week: 1_709_424_000, total: 5, days: [0, 1, 1, 1, 1, 1, 0] },
            WeeklyActivityPoint { week: 1_710_028_800, total: 3, days: [0, 0, 1, 1, 1, 0, 0] },
        ],
    );
    mock.set_pull_requests(
        "bnbchain/bsc",
        vec![item(10, ItemState::Open, true), item(11, ItemState::Closed, true)],
    );
    mock.set_issues(
        "bnbchain/bsc",
        vec![
            item(12, ItemState::Open, false),
            item(10, ItemState::Open, true),
            item(13, ItemState::Closed, false),
        ],
    );
    mock.set_commits("bnbchain/bsc", vec![commit("abc123", "Fix block validation")]);

    mock.set_contributors("bnbchain/node", vec![contributor("alice", 6), contributor("carol", 9)]);
    mock.set_activity(
        "bnbchain/node",
        vec![
            WeeklyActivityPoint::rollup(1_709_424_000, 2),
            WeeklyActivityPoint::rollup(1_710_028_800, 7),
        ],
    );
    mock.set_pull_requests("bnbchain/node", vec![item(1, ItemState::Closed, true)]);
    mock.set_issues("bnbchain/node", Vec::new());
    mock.set_commits("bnbchain/node", Vec::new());

    mock
}

pub fn manager_for(mock: Arc<MockSource>) -> Arc<InsightsManager> {
    Arc::new(InsightsManager::new(mock, PulseConfig::default()))
}
