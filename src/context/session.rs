// Dashboard Session - drives state transitions with fetched data
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

use super::state::{DashboardState, RequestTag};
use crate::{
    errors::{PulseError, PulseResult},
    insights::InsightsManager,
    window::TimeRange,
};

/// Shared dashboard session.
///
/// The lock is only held to swap snapshots, never across an upstream call.
pub struct DashboardSession {
    manager: Arc<InsightsManager>,
    state: RwLock<DashboardState>,
}

impl DashboardSession {
    pub fn new(manager: Arc<InsightsManager>) -> Self {
        Self::with_range(manager, TimeRange::default())
    }

    pub fn with_range(manager: Arc<InsightsManager>, range: TimeRange) -> Self {
        Self {
            manager,
            state: RwLock::new(DashboardState::new(range)),
        }
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.read().clone()
    }

    fn transition<T>(&self, step: impl FnOnce(&DashboardState) -> (DashboardState, T)) -> T {
        let mut state = self.state.write();
        let (next, out) = step(&state);
        *state = next;
        out
    }

    fn settle(&self, tag: &RequestTag, step: impl FnOnce(&DashboardState) -> DashboardState) {
        let mut state = self.state.write();
        if !state.is_current(tag) {
            debug!(kind = ?tag.kind, sequence = tag.sequence, "Discarding stale result");
        }
        *state = step(&state);
    }

    /// Discover repositories, then roll them up for the current range.
    pub async fn load_repositories(&self) {
        let tag = self.transition(|s| s.begin_repositories());
        let repositories = self.manager.discover_repositories().await;
        info!(count = repositories.len(), "Dashboard repositories loaded");
        self.settle(&tag, |s| s.apply_repositories(&tag, repositories));

        self.load_consolidated().await;
    }

    pub async fn load_consolidated(&self) {
        let started = self.transition(|s| match s.begin_consolidated() {
            Some((next, tag)) => (next, Some((tag, s.repositories.clone()))),
            None => (s.clone(), None),
        });
        let Some((tag, repositories)) = started else {
            return;
        };

        let result = self.manager.consolidated(&repositories, tag.range).await;
        self.settle(&tag, |s| s.apply_consolidated(&tag, result));
    }

    pub async fn load_detail(&self) {
        let started = self.transition(|s| match s.begin_detail() {
            Some((next, tag)) => (next, Some(tag)),
            None => (s.clone(), None),
        });
        let Some(tag) = started else {
            return;
        };
        let Some(full_name) = tag.repository.clone() else {
            return;
        };

        let result = self.manager.repo_detail(&full_name, tag.range).await;
        self.settle(&tag, |s| s.apply_detail(&tag, result));
    }

    /// Change the range and reload everything that depends on it.
    pub async fn set_time_range(&self, range: TimeRange) {
        self.transition(|s| (s.with_time_range(range), ()));
        info!(range = %range, "Dashboard time range changed");
        tokio::join!(self.load_consolidated(), self.load_detail());
    }

    /// Select a repository from the loaded list, or clear the selection with `None`.
    pub async fn select_repository(&self, full_name: Option<&str>) -> PulseResult<()> {
        let Some(full_name) = full_name else {
            self.transition(|s| (s.with_selection(None), ()));
            return Ok(());
        };

        let repository = self
            .state
            .read()
            .find_repository(full_name)
            .cloned()
            .ok_or_else(|| PulseError::NotFound(format!("repository not loaded: {}", full_name)))?;

        self.transition(|s| (s.with_selection(Some(repository)), ()));
        self.load_detail().await;
        Ok(())
    }

    pub async fn refresh(&self) {
        tokio::join!(self.load_repositories(), self.load_detail());
    }
}
