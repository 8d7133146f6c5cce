// ── Runtime monitor configuration ──
//
// Describes *what* to poll and *how often*. Carries no credential data
// (the sensor API is unauthenticated) and never touches disk: the
// CLI/TUI builds a `MonitorConfig` from file/env config and hands it in.

use std::time::Duration;

/// Configuration for one monitoring session against a sensor API.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Base URL of the sensor API (with or without a trailing `/api`).
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Cadence of the aggregate-counters poller.
    pub stats_interval: Duration,
    /// Cadence of the recent-events poller.
    pub events_interval: Duration,
    /// Cadence of the hourly-chart poller.
    pub chart_interval: Duration,
    /// How many recent detections the log retains (and fetches per poll).
    pub recent_capacity: usize,
    /// Page size for the chart poller's wider fetch.
    pub chart_fetch_limit: u32,
    /// How recent the last motion must be to count as "active".
    pub active_window: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".into(),
            timeout: Duration::from_secs(10),
            stats_interval: Duration::from_secs(5),
            events_interval: Duration::from_secs(8),
            chart_interval: Duration::from_secs(60),
            recent_capacity: 10,
            chart_fetch_limit: 100,
            active_window: Duration::from_secs(300),
        }
    }
}
