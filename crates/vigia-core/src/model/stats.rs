// ── Aggregate counters and derived activity state ──

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate motion counters as reported by the API.
///
/// The server is authoritative for these numbers; each successful stats
/// poll replaces the previous snapshot wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionStats {
    /// All detections ever recorded.
    pub total: u64,
    /// Detections since local midnight (server-side).
    pub today: u64,
    /// Detections in the last seven days (server-side).
    pub week: u64,
    /// Timestamp of the most recent detection, if any.
    pub last_motion: Option<DateTime<Utc>>,
}

impl MotionStats {
    /// Derive whether the sensor counts as currently active.
    ///
    /// Active iff the last motion is within `window` of `now`. A last
    /// motion slightly in the future (server clock ahead of ours) still
    /// counts as active. Never stored; recomputed at render time.
    pub fn activity(&self, window: Duration, now: DateTime<Utc>) -> ActivityState {
        let Some(last) = self.last_motion else {
            return ActivityState::Idle;
        };
        let window = chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX);
        if now.signed_duration_since(last) <= window {
            ActivityState::Active
        } else {
            ActivityState::Idle
        }
    }
}

/// Whether motion was detected recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityState {
    Active,
    Idle,
}

impl ActivityState {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Idle => write!(f, "idle"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stats_with_last_motion(last: Option<DateTime<Utc>>) -> MotionStats {
        MotionStats {
            total: 10,
            today: 2,
            week: 5,
            last_motion: last,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 26, 12, 0, 0).unwrap()
    }

    const WINDOW: Duration = Duration::from_secs(300);

    #[test]
    fn recent_motion_is_active() {
        let stats = stats_with_last_motion(Some(now() - chrono::Duration::minutes(2)));
        assert_eq!(stats.activity(WINDOW, now()), ActivityState::Active);
    }

    #[test]
    fn old_motion_is_idle() {
        let stats = stats_with_last_motion(Some(now() - chrono::Duration::minutes(10)));
        assert_eq!(stats.activity(WINDOW, now()), ActivityState::Idle);
    }

    #[test]
    fn missing_motion_is_idle() {
        let stats = stats_with_last_motion(None);
        assert_eq!(stats.activity(WINDOW, now()), ActivityState::Idle);
    }

    #[test]
    fn motion_exactly_at_window_edge_is_active() {
        let stats = stats_with_last_motion(Some(now() - chrono::Duration::seconds(300)));
        assert_eq!(stats.activity(WINDOW, now()), ActivityState::Active);
    }

    #[test]
    fn future_motion_counts_as_active() {
        // Server clock slightly ahead of ours.
        let stats = stats_with_last_motion(Some(now() + chrono::Duration::seconds(30)));
        assert_eq!(stats.activity(WINDOW, now()), ActivityState::Active);
    }
}
