use thiserror::Error;

/// Top-level error type for the `vigia-api` crate.
///
/// Three failure classes matter to callers: the transport failed (tunnel or
/// backend down), the server answered with a failure status, or the body did
/// not have a recognizable shape. `vigia-core` maps these into user-facing
/// diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Server status ───────────────────────────────────────────────
    /// Non-2xx response. `message` is the server-supplied one when the
    /// failure body parses, else a status-derived fallback.
    #[error("API request failed (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    // ── Protocol ────────────────────────────────────────────────────
    /// The server answered 2xx but the envelope carried `success: false`.
    #[error("API reported failure: {message}")]
    Api { message: String },

    /// JSON body did not match any recognized shape, with the raw body
    /// for debugging.
    #[error("Unrecognized response body: {message}")]
    Decode { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll tick.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Http { status: 404, .. } => true,
            _ => false,
        }
    }
}
