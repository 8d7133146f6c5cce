// ── Core error types ──
//
// User-facing errors from vigia-core. Consumers never see raw reqwest
// errors or JSON parse failures directly; the `From<vigia_api::Error>`
// impl translates transport-layer failures into domain-appropriate
// variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the sensor API: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unexpected response from the API: {message}")]
    Decode { message: String },

    // ── Upstream errors ──────────────────────────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if the failure came with one).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vigia_api::Error> for CoreError {
    fn from(err: vigia_api::Error) -> Self {
        match err {
            vigia_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        message: e.to_string(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                }
            }
            vigia_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vigia_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            vigia_api::Error::Http {
                status: 404,
                message,
            } => CoreError::NotFound { message },
            vigia_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            vigia_api::Error::Api { message } => CoreError::Api {
                message,
                status: None,
            },
            vigia_api::Error::Decode { message, body: _ } => CoreError::Decode { message },
        }
    }
}
