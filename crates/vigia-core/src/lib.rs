// vigia-core: Polling engine and domain model between vigia-api and the UIs.

pub mod config;
pub mod convert;
pub mod error;
pub mod humanize;
pub mod model;
pub mod monitor;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::MonitorConfig;
pub use error::CoreError;
pub use monitor::{LinkState, Monitor};
pub use store::DataStore;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ActivityState, DetectionLog, HOUR_BUCKETS, HourlyBucket, HourlySeries, MotionEvent,
    MotionStats,
};

// Wire metadata that one-shot queries surface as-is.
pub use vigia_api::{HealthReport, Pagination, RegisterReceipt};
