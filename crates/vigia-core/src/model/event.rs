// ── Motion event domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One motion detection reported by the sensor.
///
/// Identity is `id`: two events with the same `id` are the same event
/// and must never both appear in a rendered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionEvent {
    pub id: u64,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

impl MotionEvent {
    /// Sort key: newest first, ties broken by id so ordering is
    /// deterministic even when two events share a timestamp.
    pub(crate) fn sort_key(&self) -> (DateTime<Utc>, u64) {
        (self.occurred_at, self.id)
    }
}
