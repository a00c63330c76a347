// Pulse Service Configuration
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    pub service_port: u16,
    pub host: String,

    // Upstream API
    pub api_base: String,
    pub user_agent: String,

    // Discovery sources
    pub topic: String,
    pub primary_org: String,
    pub legacy_org: String,

    // Page sizes and fan-out bounds
    pub search_page_size: u32,
    pub list_page_size: u32,
    pub contributor_limit: u32,
    pub fan_out_limit: usize,
    pub top_contributors: usize,

    // Timeouts
    pub request_timeout_secs: u64,

    // Browser dashboard origin
    pub allowed_origin: Option<String>,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            service_port: 3010,
            host: "0.0.0.0".to_string(),
            api_base: "https://api.github.com".to_string(),
            user_agent: "pulse-service".to_string(),
            topic: "bnb-chain".to_string(),
            primary_org: "bnbchain".to_string(),
            legacy_org: "binance-chain".to_string(),
            search_page_size: 100,
            list_page_size: 100,
            contributor_limit: 10,
            fan_out_limit: 10,
            top_contributors: 10,
            request_timeout_secs: 15,
            allowed_origin: None,
        }
    }
}

impl PulseConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, fallback: String| lookup(key).unwrap_or(fallback);

        Ok(Self {
            service_port: parse_or(&lookup, "PULSE_SERVICE_PORT", defaults.service_port)?,
            host: text("HOST", defaults.host),

            api_base: text("GITHUB_API_BASE", defaults.api_base)
                .trim_end_matches('/')
                .to_string(),
            user_agent: text("PULSE_USER_AGENT", defaults.user_agent),

            topic: text("PULSE_TOPIC", defaults.topic),
            primary_org: text("PULSE_PRIMARY_ORG", defaults.primary_org),
            legacy_org: text("PULSE_LEGACY_ORG", defaults.legacy_org),

            search_page_size: parse_or(&lookup, "PULSE_SEARCH_PAGE_SIZE", defaults.search_page_size)?,
            list_page_size: parse_or(&lookup, "PULSE_LIST_PAGE_SIZE", defaults.list_page_size)?,
            contributor_limit: parse_or(&lookup, "PULSE_CONTRIBUTOR_LIMIT", defaults.contributor_limit)?,
            fan_out_limit: parse_or(&lookup, "PULSE_FAN_OUT_LIMIT", defaults.fan_out_limit)?,
            top_contributors: parse_or(&lookup, "PULSE_TOP_CONTRIBUTORS", defaults.top_contributors)?,

            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,

            // "*" or blank leaves CORS open to any origin
            allowed_origin: lookup("PULSE_ALLOWED_ORIGIN")
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty() && o != "*"),
        })
    }

    /// The three discovery queries: topic tag, current org account, legacy org account.
    pub fn discovery_queries(&self) -> Vec<String> {
        vec![
            format!("topic:{}", self.topic),
            format!("org:{}", self.primary_org),
            format!("org:{}", self.legacy_org),
        ]
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, fallback: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(fallback),
    }
}
