//! Analysis session state machine.
//!
//! The UI-facing mutable state (loading flag, error string, current
//! estimate) is modeled as an explicit finite state machine with pure
//! transitions driven by request lifecycle events, held in a single owned
//! container that the presentation layer observes over HTTP.

use parking_lot::RwLock;
use serde::Serialize;

use crate::domain::ProjectDetails;

/// The state of the current analysis session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Success(ProjectDetails),
    Failure(String),
}

/// Request lifecycle events that drive the state machine.
#[derive(Debug, Clone)]
pub enum AnalysisEvent {
    Started,
    Completed(ProjectDetails),
    Failed(String),
}

impl AnalysisState {
    /// Pure transition function. Transitions are total: re-triggering while
    /// loading is permitted (the in-flight guard is advisory, UI-level) and
    /// the later-resolving request overwrites the state.
    pub fn apply(self, event: AnalysisEvent) -> AnalysisState {
        match event {
            AnalysisEvent::Started => AnalysisState::Loading,
            AnalysisEvent::Completed(details) => AnalysisState::Success(details),
            AnalysisEvent::Failed(message) => AnalysisState::Failure(message),
        }
    }

    #[allow(dead_code)]
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading)
    }
}

/// Serializable view of the session state for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisSnapshot {
    Idle,
    Loading,
    Success { estimate: ProjectDetails },
    Failure { error: String },
}

impl From<&AnalysisState> for AnalysisSnapshot {
    fn from(state: &AnalysisState) -> Self {
        match state {
            AnalysisState::Idle => AnalysisSnapshot::Idle,
            AnalysisState::Loading => AnalysisSnapshot::Loading,
            AnalysisState::Success(details) => AnalysisSnapshot::Success {
                estimate: details.clone(),
            },
            AnalysisState::Failure(message) => AnalysisSnapshot::Failure {
                error: message.clone(),
            },
        }
    }
}

/// Owned container for the session state. Handler execution is serialized
/// per event by the lock; there is no cross-request mutual exclusion.
#[derive(Default)]
pub struct EstimateSession {
    state: RwLock<AnalysisState>,
}

impl EstimateSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, event: AnalysisEvent) {
        let mut guard = self.state.write();
        let current = std::mem::take(&mut *guard);
        *guard = current.apply(event);
    }

    pub fn snapshot(&self) -> AnalysisSnapshot {
        AnalysisSnapshot::from(&*self.state.read())
    }

    #[cfg(test)]
    pub fn current(&self) -> AnalysisState {
        self.state.read().clone()
    }
}
