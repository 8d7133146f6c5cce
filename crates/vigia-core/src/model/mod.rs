// ── Domain model ──
//
// Canonical representations of sensor telemetry. Wire-format quirks
// (Spanish field names, envelope shapes, timestamp encodings) are
// resolved in vigia-api; consumers (CLI/TUI) only ever see these types.

pub mod event;
pub mod log;
pub mod series;
pub mod stats;

// ── Re-exports ──────────────────────────────────────────────────────

pub use event::MotionEvent;
pub use log::DetectionLog;
pub use series::{HOUR_BUCKETS, HourlyBucket, HourlySeries};
pub use stats::{ActivityState, MotionStats};
