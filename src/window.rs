//! Time range selection and the date filters derived from it.
//!
//! A [`TimeRange`] is the symbolic token picked in the dashboard (`1d`, `7d`,
//! `30d`, `90d`). Resolving it against the wall clock gives a [`TimeWindow`],
//! which only exists to parameterize upstream queries: list endpoints take a
//! date-only `since`, the commit list takes a full timestamp.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
}

impl TimeRange {
    /// Parse a range token. Unknown tokens fall back to the 7-day range.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "1d" => TimeRange::Day,
            "7d" => TimeRange::Week,
            "30d" => TimeRange::Month,
            "90d" => TimeRange::Quarter,
            _ => TimeRange::Week,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            TimeRange::Day => "1d",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Day => "24 hours",
            TimeRange::Week => "7 days",
            TimeRange::Month => "30 days",
            TimeRange::Quarter => "90 days",
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            TimeRange::Day => 1,
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
        }
    }

    pub fn all() -> [TimeRange; 4] {
        [
            TimeRange::Day,
            TimeRange::Week,
            TimeRange::Month,
            TimeRange::Quarter,
        ]
    }

    /// Resolve against the current wall clock.
    pub fn resolve(&self) -> TimeWindow {
        self.resolve_at(Utc::now())
    }

    pub fn resolve_at(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow {
            start: now - Duration::days(self.days()),
            end: now,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for TimeRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(TimeRange::from_token(&token))
    }
}

/// Concrete start/end instants for one resolved range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// `since` filter for pull request and issue lists (`YYYY-MM-DD`).
    pub fn since_date(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// `since` filter for the commit list (RFC 3339, millisecond precision).
    pub fn since_timestamp(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn span_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}
