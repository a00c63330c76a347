//! Dashboard state as an explicit value.
//!
//! Every transition borrows the current snapshot and returns the next one. A
//! fetch starts with a `begin_*` transition that hands out a [`RequestTag`];
//! the matching `apply_*` transition drops the result unless the tag still
//! describes the current state, so a slow response for a superseded range or
//! selection never overwrites newer data.

use serde::Serialize;

use super::schema::*;
use crate::{errors::PulseResult, window::TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Repositories,
    Consolidated,
    Detail,
}

/// Correlates a fetch result with the state it was requested for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestTag {
    pub kind: RequestKind,
    pub sequence: u64,
    pub range: TimeRange,
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub time_range: TimeRange,

    pub repositories: Vec<RepositorySummary>,
    pub loading: bool,
    pub error: Option<String>,

    pub selected: Option<RepositorySummary>,
    pub detail: Option<RepoDetail>,
    pub fetching_details: bool,
    pub detail_error: Option<String>,

    pub consolidated: Option<ConsolidatedBundle>,
    pub fetching_consolidated: bool,
    pub consolidated_error: Option<String>,

    #[serde(skip)]
    sequences: [u64; 3],
}

impl DashboardState {
    pub fn new(time_range: TimeRange) -> Self {
        Self {
            time_range,
            ..Self::default()
        }
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected.as_ref().map(|r| r.full_name())
    }

    pub fn find_repository(&self, full_name: &str) -> Option<&RepositorySummary> {
        self.repositories.iter().find(|r| r.full_name() == full_name)
    }

    fn slot(kind: RequestKind) -> usize {
        match kind {
            RequestKind::Repositories => 0,
            RequestKind::Consolidated => 1,
            RequestKind::Detail => 2,
        }
    }

    fn issue(&mut self, kind: RequestKind) -> RequestTag {
        let slot = Self::slot(kind);
        self.sequences[slot] += 1;
        RequestTag {
            kind,
            sequence: self.sequences[slot],
            range: self.time_range,
            repository: match kind {
                RequestKind::Detail => self.selected_name().map(str::to_string),
                _ => None,
            },
        }
    }

    /// Whether a result carrying `tag` may still be applied.
    pub fn is_current(&self, tag: &RequestTag) -> bool {
        let latest = self.sequences[Self::slot(tag.kind)] == tag.sequence;
        match tag.kind {
            RequestKind::Repositories => latest,
            RequestKind::Consolidated => latest && tag.range == self.time_range,
            RequestKind::Detail => {
                latest
                    && tag.range == self.time_range
                    && tag.repository.as_deref() == self.selected_name()
            }
        }
    }

    pub fn with_time_range(&self, range: TimeRange) -> Self {
        let mut next = self.clone();
        next.time_range = range;
        next
    }

    /// Select a repository (or clear the selection), discarding any previous detail.
    pub fn with_selection(&self, repository: Option<RepositorySummary>) -> Self {
        let mut next = self.clone();
        next.selected = repository;
        next.detail = None;
        next.detail_error = None;
        next.fetching_details = false;
        next
    }

    pub fn begin_repositories(&self) -> (Self, RequestTag) {
        let mut next = self.clone();
        next.loading = true;
        next.error = None;
        let tag = next.issue(RequestKind::Repositories);
        (next, tag)
    }

    /// An empty list is a degraded result, reported in `error` but still applied.
    ///
    /// The rollup of an empty list is dropped along with any in-flight one, and a
    /// selection missing from the new list is cleared with its detail.
    pub fn apply_repositories(&self, tag: &RequestTag, repositories: Vec<RepositorySummary>) -> Self {
        let mut next = self.clone();
        if !self.is_current(tag) {
            return next;
        }
        next.loading = false;

        if repositories.is_empty() {
            next.error = Some("No repositories could be loaded".to_string());
            next.consolidated = None;
            next.consolidated_error = None;
            next.fetching_consolidated = false;
            next.issue(RequestKind::Consolidated);
        } else {
            next.error = None;
        }

        let reselected = self
            .selected_name()
            .and_then(|name| repositories.iter().find(|r| r.full_name() == name).cloned());
        next.repositories = repositories;

        match reselected {
            Some(repository) => next.selected = Some(repository),
            None if next.selected.is_some() => next = next.with_selection(None),
            None => {}
        }
        next
    }

    /// `None` when there is nothing to consolidate yet.
    pub fn begin_consolidated(&self) -> Option<(Self, RequestTag)> {
        if self.repositories.is_empty() {
            return None;
        }
        let mut next = self.clone();
        next.fetching_consolidated = true;
        next.consolidated_error = None;
        let tag = next.issue(RequestKind::Consolidated);
        Some((next, tag))
    }

    pub fn apply_consolidated(&self, tag: &RequestTag, result: PulseResult<ConsolidatedBundle>) -> Self {
        let mut next = self.clone();
        if !self.is_current(tag) {
            return next;
        }
        next.fetching_consolidated = false;
        match result {
            Ok(bundle) => {
                next.consolidated = Some(bundle);
                next.consolidated_error = None;
            }
            Err(e) => next.consolidated_error = Some(e.to_string()),
        }
        next
    }

    /// `None` when no repository is selected.
    pub fn begin_detail(&self) -> Option<(Self, RequestTag)> {
        self.selected.as_ref()?;
        let mut next = self.clone();
        next.fetching_details = true;
        next.detail_error = None;
        let tag = next.issue(RequestKind::Detail);
        Some((next, tag))
    }

    pub fn apply_detail(&self, tag: &RequestTag, result: PulseResult<RepoDetail>) -> Self {
        let mut next = self.clone();
        if !self.is_current(tag) {
            return next;
        }
        next.fetching_details = false;
        match result {
            Ok(detail) => {
                next.detail = Some(detail);
                next.detail_error = None;
            }
            Err(e) => {
                next.detail = None;
                next.detail_error = Some(e.to_string());
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PulseError;
    use chrono::Utc;

    fn repo(id: u64, name: &str) -> RepositorySummary {
        RepositorySummary {
            identity: RepositoryIdentity::new(id, "bnbchain", name),
            description: None,
            html_url: String::new(),
            stargazers_count: id,
            forks_count: 0,
            open_issues_count: 0,
            updated_at: Utc::now(),
            language: None,
            owner_avatar_url: String::new(),
        }
    }

    fn loaded() -> DashboardState {
        let (state, tag) = DashboardState::default().begin_repositories();
        state.apply_repositories(&tag, vec![repo(1, "bsc"), repo(2, "node")])
    }

    #[test]
    fn default_range_is_seven_days() {
        assert_eq!(DashboardState::default().time_range, TimeRange::Week);
    }

    #[test]
    fn empty_discovery_is_flagged_but_applied() {
        let (state, tag) = DashboardState::default().begin_repositories();
        assert!(state.loading);
        let state = state.apply_repositories(&tag, Vec::new());
        assert!(!state.loading);
        assert!(state.error.is_some());
        assert!(state.begin_consolidated().is_none());
    }

    #[test]
    fn consolidated_result_for_old_range_is_discarded() {
        let (state, tag) = loaded().begin_consolidated().unwrap();
        let state = state.with_time_range(TimeRange::Month);

        let state = state.apply_consolidated(&tag, Ok(ConsolidatedBundle::default()));
        assert!(state.consolidated.is_none());
        assert!(state.fetching_consolidated);
    }

    #[test]
    fn superseded_request_loses_to_newer_one() {
        let state = loaded();
        let (state, first) = state.begin_consolidated().unwrap();
        let (state, second) = state.begin_consolidated().unwrap();

        let newer = ConsolidatedBundle { total_repos: 2, ..Default::default() };
        let state = state.apply_consolidated(&second, Ok(newer.clone()));
        let state = state.apply_consolidated(&first, Ok(ConsolidatedBundle::default()));
        assert_eq!(state.consolidated, Some(newer));
    }

    #[test]
    fn detail_for_previous_selection_is_discarded() {
        let state = loaded();
        let bsc = state.find_repository("bnbchain/bsc").cloned();
        let node = state.find_repository("bnbchain/node").cloned();

        let (state, tag) = state.with_selection(bsc).begin_detail().unwrap();
        assert_eq!(tag.repository.as_deref(), Some("bnbchain/bsc"));

        let state = state.with_selection(node);
        let state = state.apply_detail(&tag, Ok(RepoDetail::default()));
        assert!(state.detail.is_none());
        assert_eq!(state.selected_name(), Some("bnbchain/node"));
    }

    #[test]
    fn detail_failure_is_recorded() {
        let state = loaded();
        let bsc = state.find_repository("bnbchain/bsc").cloned();
        let (state, tag) = state.with_selection(bsc).begin_detail().unwrap();

        let state = state.apply_detail(&tag, Err(PulseError::Aggregate("issues failed".into())));
        assert!(!state.fetching_details);
        assert!(state.detail.is_none());
        assert_eq!(state.detail_error.as_deref(), Some("Aggregate failure: issues failed"));
    }

    #[test]
    fn empty_reload_drops_rollup_and_selection() {
        let state = loaded();
        let bsc = state.find_repository("bnbchain/bsc").cloned();
        let (state, pending) = state.with_selection(bsc).begin_consolidated().unwrap();
        let state = state.apply_consolidated(&pending, Ok(ConsolidatedBundle { total_repos: 2, ..Default::default() }));
        let (state, in_flight) = state.begin_consolidated().unwrap();

        let (state, tag) = state.begin_repositories();
        let state = state.apply_repositories(&tag, Vec::new());
        assert!(state.consolidated.is_none());
        assert!(!state.fetching_consolidated);
        assert!(state.selected.is_none());
        assert!(state.detail.is_none());

        let state = state.apply_consolidated(&in_flight, Ok(ConsolidatedBundle::default()));
        assert!(state.consolidated.is_none());
    }

    #[test]
    fn reload_keeps_selection_still_listed() {
        let state = loaded();
        let node = state.find_repository("bnbchain/node").cloned();
        let state = state.with_selection(node);

        let (state, tag) = state.begin_repositories();
        let mut updated = repo(2, "node");
        updated.stargazers_count = 50;
        let state = state.apply_repositories(&tag, vec![updated]);
        assert_eq!(state.selected.as_ref().map(|r| r.stargazers_count), Some(50));

        let (state, tag) = state.begin_repositories();
        let state = state.apply_repositories(&tag, vec![repo(1, "bsc")]);
        assert!(state.selected.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn no_detail_request_without_selection() {
        assert!(loaded().begin_detail().is_none());
    }
}
