// ── Hourly activity series ──
//
// The chart poller recomputes one of these from scratch on every poll:
// detections in the trailing 24 hours, bucketed by UTC hour of day.
// Recomputing (rather than incrementally shifting buckets) keeps the
// series a pure function of the fetched page and the current instant.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::event::MotionEvent;

/// Number of buckets in the series. Fixed: the chart never grows or
/// shrinks across updates.
pub const HOUR_BUCKETS: usize = 24;

/// One labeled chart bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyBucket {
    /// Hour-of-day label, `"0:00"` through `"23:00"`.
    pub label: String,
    pub value: u64,
}

/// Detection counts for the trailing 24 hours, bucketed by UTC hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlySeries {
    buckets: Vec<HourlyBucket>,
}

impl HourlySeries {
    /// An all-zero series with the full set of hour labels.
    pub fn empty() -> Self {
        let buckets = (0..HOUR_BUCKETS)
            .map(|hour| HourlyBucket {
                label: format!("{hour}:00"),
                value: 0,
            })
            .collect();
        Self { buckets }
    }

    /// Bucket `events` by hour of day, counting only those within the
    /// 24 hours before `now`. Events dated slightly in the future
    /// (server clock ahead) are counted in their stated hour.
    pub fn from_events(events: &[MotionEvent], now: DateTime<Utc>) -> Self {
        let mut series = Self::empty();
        let cutoff = now - chrono::Duration::hours(24);
        for event in events {
            if event.occurred_at > cutoff {
                let hour = event.occurred_at.hour() as usize;
                series.buckets[hour].value += 1;
            }
        }
        series
    }

    pub fn buckets(&self) -> &[HourlyBucket] {
        &self.buckets
    }

    /// Bucket values in hour order, for sparkline-style rendering.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.iter().map(|b| b.value)
    }

    /// Sum of all bucket values.
    pub fn total(&self) -> u64 {
        self.values().sum()
    }

    /// Largest bucket value (0 for an all-zero series).
    pub fn max(&self) -> u64 {
        self.values().max().unwrap_or(0)
    }
}

impl Default for HourlySeries {
    fn default() -> Self {
        Self::empty()
    }
}
