// vigia-api: Async Rust client for the PIR motion-sensor REST API

pub mod client;
mod envelope;
pub mod error;
pub mod timestamp;
pub mod transport;
pub mod types;

pub use client::SensorClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{HealthReport, MovementPage, Pagination, RawMovement, RawStats, RegisterReceipt};
