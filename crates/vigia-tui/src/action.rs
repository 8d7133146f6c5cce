//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use vigia_core::{DetectionLog, HourlySeries, LinkState, MotionStats};

use crate::screen::ScreenId;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ─────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Data updates (from the monitor's store) ────────────────────
    StatsUpdated(Arc<MotionStats>),
    LogUpdated(Arc<DetectionLog>),
    SeriesUpdated(Arc<HourlySeries>),
    RefreshedAt(DateTime<Utc>),
    LinkChanged(LinkState),

    // ── Commands ───────────────────────────────────────────────────
    /// Nudge all pollers to fetch immediately.
    RefreshNow,
    ToggleEventPause,
}
