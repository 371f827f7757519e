use chrono::{DateTime, Utc};
use serde::Serialize;

use super::state::RepEvent;

/// Ephemeral per-session rep accumulator. This is a staging area the user
/// reviews before committing; counts that are never committed are lost when
/// the capture session ends.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounter {
    session_id: String,
    count: u32,
    last_event_at: Option<DateTime<Utc>>,
}

impl SessionCounter {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            count: 0,
            last_event_at: None,
        }
    }

    pub fn apply(&mut self, event: &RepEvent) {
        self.count += 1;
        self.last_event_at = Some(event.timestamp);
    }

    /// Zero the staged count (user-initiated reset, or session teardown).
    pub fn reset(&mut self) {
        self.count = 0;
        self.last_event_at = None;
    }

    /// Remove a successfully committed amount from the staged count. The
    /// capture loop may have applied further reps while the commit was in
    /// flight; those stay staged for the next commit rather than being
    /// wiped by a blanket reset.
    pub fn commit_staged(&mut self, committed: u32) {
        self.count = self.count.saturating_sub(committed);
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.last_event_at
    }
}
