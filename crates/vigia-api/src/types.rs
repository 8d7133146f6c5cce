// Wire types for the sensor API.
//
// Field names on the wire are the upstream's Spanish ones; serde renames
// keep the Rust surface English.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Aggregate counters from `GET /api/estadisticas`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStats {
    pub total: u64,
    #[serde(rename = "hoy")]
    pub today: u64,
    #[serde(rename = "semana")]
    pub week: u64,
    #[serde(
        rename = "ultimo_movimiento",
        default,
        deserialize_with = "timestamp::deserialize_opt"
    )]
    pub last_motion: Option<DateTime<Utc>>,
}

/// One motion record from the movements endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMovement {
    pub id: u64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fecha_hora", deserialize_with = "timestamp::deserialize")]
    pub occurred_at: DateTime<Utc>,
}

/// Pagination block attached to wrapped list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

/// One page of movements, newest-first.
#[derive(Debug, Clone)]
pub struct MovementPage {
    pub movements: Vec<RawMovement>,
    /// Present only when the server wrapped the list with metadata.
    pub pagination: Option<Pagination>,
}

/// Acknowledgement from `POST /api/movimiento`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterReceipt {
    pub id: u64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Upstream health probe result from `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub message: Option<String>,
}
