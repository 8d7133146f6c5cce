// ── API-to-domain type conversions ──
//
// Bridges raw `vigia_api` response types into canonical
// `vigia_core::model` types. The wire layer already normalized
// envelopes and parsed timestamps, so these impls are plain moves.

use vigia_api::{RawMovement, RawStats};

use crate::model::{MotionEvent, MotionStats};

impl From<RawStats> for MotionStats {
    fn from(raw: RawStats) -> Self {
        Self {
            total: raw.total,
            today: raw.today,
            week: raw.week,
            last_motion: raw.last_motion,
        }
    }
}

impl From<RawMovement> for MotionEvent {
    fn from(raw: RawMovement) -> Self {
        Self {
            id: raw.id,
            description: raw.description,
            occurred_at: raw.occurred_at,
        }
    }
}
