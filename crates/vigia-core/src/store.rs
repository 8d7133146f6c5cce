// ── Reactive data store ──
//
// Watch-channel storage for the three poller outputs. Single-writer:
// only the Monitor's poller tasks publish; UIs subscribe or take
// snapshots. Every slot starts as `None` so consumers can tell
// "still loading" apart from "loaded and empty".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{DetectionLog, HourlySeries, MotionStats};

/// Reactive store for the latest published poller snapshots.
pub struct DataStore {
    stats: watch::Sender<Option<Arc<MotionStats>>>,
    log: watch::Sender<Option<Arc<DetectionLog>>>,
    series: watch::Sender<Option<Arc<HourlySeries>>>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (stats, _) = watch::channel(None);
        let (log, _) = watch::channel(None);
        let (series, _) = watch::channel(None);
        let (last_refresh, _) = watch::channel(None);

        Self {
            stats,
            log,
            series,
            last_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn stats_snapshot(&self) -> Option<Arc<MotionStats>> {
        self.stats.borrow().clone()
    }

    pub fn log_snapshot(&self) -> Option<Arc<DetectionLog>> {
        self.log.borrow().clone()
    }

    pub fn series_snapshot(&self) -> Option<Arc<HourlySeries>> {
        self.series.borrow().clone()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_stats(&self) -> watch::Receiver<Option<Arc<MotionStats>>> {
        self.stats.subscribe()
    }

    pub fn subscribe_log(&self) -> watch::Receiver<Option<Arc<DetectionLog>>> {
        self.log.subscribe()
    }

    pub fn subscribe_series(&self) -> watch::Receiver<Option<Arc<HourlySeries>>> {
        self.series.subscribe()
    }

    pub fn subscribe_last_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_refresh.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    /// When any poller last succeeded.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last successful poll was, or `None` if the API
    /// has never answered.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    // ── Publishers (poller tasks only) ───────────────────────────────
    //
    // `send_replace` rather than `send`: the value must stick even
    // while nobody is subscribed yet.

    pub(crate) fn publish_stats(&self, stats: Arc<MotionStats>) {
        self.stats.send_replace(Some(stats));
    }

    pub(crate) fn publish_log(&self, log: Arc<DetectionLog>) {
        self.log.send_replace(Some(log));
    }

    pub(crate) fn publish_series(&self, series: Arc<HourlySeries>) {
        self.series.send_replace(Some(series));
    }

    pub(crate) fn mark_refreshed(&self) {
        self.last_refresh.send_replace(Some(Utc::now()));
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
