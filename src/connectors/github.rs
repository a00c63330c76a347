// GitHub Connector - public REST endpoints, unauthenticated
use super::StatsSource;
use crate::{
    config::PulseConfig,
    context::*,
    errors::{PulseError, PulseResult},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

pub struct GitHubConnector {
    api_base: String,
    search_page_size: u32,
    list_page_size: u32,
    timeout_secs: u64,

    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GitHubSearchResponse {
    #[serde(default)]
    items: Vec<GitHubRepo>,
}

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    id: u64,
    name: String,
    full_name: String,
    owner: GitHubOwner,
    description: Option<String>,
    html_url: String,
    stargazers_count: u64,
    forks_count: u64,
    open_issues_count: u64,
    updated_at: DateTime<Utc>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubOwner {
    login: String,
    #[serde(default)]
    avatar_url: String,
}

#[derive(Debug, Deserialize)]
struct GitHubContributor {
    #[serde(default)]
    login: String,
    #[serde(default)]
    avatar_url: String,
    #[serde(default)]
    contributions: u64,
    #[serde(default)]
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct GitHubWeek {
    #[serde(default)]
    total: u64,
    week: i64,
    #[serde(default)]
    days: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct GitHubItem {
    number: u64,
    state: String,
    pull_request: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitEntry {
    sha: String,
    commit: GitHubCommitData,
    html_url: String,
    author: Option<GitHubAccount>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitData {
    message: String,
    author: GitHubSignature,
    committer: GitHubSignature,
}

#[derive(Debug, Deserialize)]
struct GitHubSignature {
    name: String,
    email: String,
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GitHubAccount {
    #[serde(default)]
    avatar_url: String,
}

impl GitHubConnector {
    pub fn new(
        api_base: String,
        user_agent: &str,
        search_page_size: u32,
        list_page_size: u32,
        timeout_secs: u64,
    ) -> PulseResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_V3));

        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            search_page_size,
            list_page_size,
            timeout_secs,
            client,
        })
    }

    pub fn from_config(config: &PulseConfig) -> PulseResult<Self> {
        Self::new(
            config.api_base.clone(),
            &config.user_agent,
            config.search_page_size,
            config.list_page_size,
            config.request_timeout_secs,
        )
    }

    /// Client timeouts cover the body read too, so both map the same way.
    fn request_error(&self, path: &str, e: reqwest::Error) -> PulseError {
        if e.is_timeout() {
            PulseError::Timeout {
                endpoint: path.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            PulseError::Http(e)
        }
    }

    async fn send(&self, path: &str, query: &[(&str, String)]) -> PulseResult<reqwest::Response> {
        let url = format!("{}/{}", self.api_base, path);
        debug!(url = %url, ?query, "GitHub request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.request_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            warn!(status = status.as_u16(), endpoint = path, message, "GitHub API error");
            return Err(PulseError::Transport {
                status: status.as_u16(),
                endpoint: path.to_string(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> PulseResult<T> {
        let response = self.send(path, query).await?;
        let bytes = response.bytes().await.map_err(|e| self.request_error(path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn parse_state(state: &str) -> ItemState {
        if state == "open" {
            ItemState::Open
        } else {
            ItemState::Closed
        }
    }

    async fn list_items(&self, path: &str, since_date: &str) -> PulseResult<Vec<TrackedItem>> {
        let items: Vec<GitHubItem> = self
            .get_json(
                path,
                &[
                    ("state", "all".to_string()),
                    ("per_page", self.list_page_size.to_string()),
                    ("since", since_date.to_string()),
                ],
            )
            .await?;

        Ok(items
            .into_iter()
            .map(|i| TrackedItem {
                number: i.number,
                state: Self::parse_state(&i.state),
                is_pull_request: i.pull_request.is_some(),
            })
            .collect())
    }
}

#[async_trait]
impl StatsSource for GitHubConnector {
    fn id(&self) -> &'static str {
        "github"
    }

    async fn search_repositories(&self, query: &str) -> PulseResult<Vec<RepositorySummary>> {
        let response: GitHubSearchResponse = self
            .get_json(
                "search/repositories",
                &[
                    ("q", query.to_string()),
                    ("sort", "updated".to_string()),
                    ("per_page", self.search_page_size.to_string()),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|r| RepositorySummary {
                identity: RepositoryIdentity {
                    id: r.id,
                    owner: r.owner.login,
                    name: r.name,
                    full_name: r.full_name,
                },
                description: r.description,
                html_url: r.html_url,
                stargazers_count: r.stargazers_count,
                forks_count: r.forks_count,
                open_issues_count: r.open_issues_count,
                updated_at: r.updated_at,
                language: r.language,
                owner_avatar_url: r.owner.avatar_url,
            })
            .collect())
    }

    async fn contributors(&self, full_name: &str, limit: u32) -> PulseResult<Vec<ContributionRecord>> {
        let path = format!("repos/{}/contributors", full_name);
        let contributors: Vec<GitHubContributor> = self
            .get_json(&path, &[("per_page", limit.to_string())])
            .await?;

        Ok(contributors
            .into_iter()
            .map(|c| ContributionRecord {
                login: c.login,
                avatar_url: c.avatar_url,
                contributions: c.contributions,
                html_url: c.html_url,
            })
            .collect())
    }

    async fn commit_activity(&self, full_name: &str) -> PulseResult<Vec<WeeklyActivityPoint>> {
        let path = format!("repos/{}/stats/commit_activity", full_name);
        let response = self.send(&path, &[]).await?;

        // 202: statistics still being computed, 204: empty repository
        if matches!(response.status(), StatusCode::ACCEPTED | StatusCode::NO_CONTENT) {
            debug!(repo = full_name, status = response.status().as_u16(), "Commit activity not ready");
            return Ok(Vec::new());
        }

        let bytes = response.bytes().await.map_err(|e| self.request_error(&path, e))?;
        let weeks: Vec<GitHubWeek> = serde_json::from_slice(&bytes)?;

        Ok(weeks
            .into_iter()
            .map(|w| {
                let mut days = [0u64; 7];
                for (slot, count) in days.iter_mut().zip(w.days) {
                    *slot = count;
                }
                WeeklyActivityPoint {
                    week: w.week,
                    total: w.total,
                    days,
                }
            })
            .collect())
    }

    async fn pull_requests(&self, full_name: &str, since_date: &str) -> PulseResult<Vec<TrackedItem>> {
        self.list_items(&format!("repos/{}/pulls", full_name), since_date)
            .await
    }

    async fn issues(&self, full_name: &str, since_date: &str) -> PulseResult<Vec<TrackedItem>> {
        self.list_items(&format!("repos/{}/issues", full_name), since_date)
            .await
    }

    async fn commits(&self, full_name: &str, since: &str) -> PulseResult<Vec<CommitRecord>> {
        let path = format!("repos/{}/commits", full_name);
        let entries: Vec<GitHubCommitEntry> = self
            .get_json(
                &path,
                &[
                    ("since", since.to_string()),
                    ("per_page", self.list_page_size.to_string()),
                ],
            )
            .await?;

        Ok(entries
            .into_iter()
            .map(|c| CommitRecord {
                sha: c.sha,
                message: c.commit.message,
                author: CommitSignature {
                    name: c.commit.author.name,
                    email: c.commit.author.email,
                    date: c.commit.author.date,
                },
                committer: CommitSignature {
                    name: c.commit.committer.name,
                    email: c.commit.committer.email,
                    date: c.commit.committer.date,
                },
                html_url: c.html_url,
                avatar_url: c.author.map(|a| a.avatar_url).unwrap_or_default(),
            })
            .collect())
    }
}
