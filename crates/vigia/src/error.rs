//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use vigia_config::ConfigError;
use vigia_core::CoreError;

/// Process exit codes for failures; success is the usual 0.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the sensor API: {reason}")]
    #[diagnostic(
        code(vigia::connection_failed),
        help(
            "Check that the API is running and the tunnel URL is current.\n\
             Try: vigia health"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(vigia::timeout),
        help("Increase the timeout with --timeout or check the tunnel.")
    )]
    Timeout { seconds: u64 },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(vigia::not_found),
        help("Run: vigia events list to see recorded events")
    )]
    NotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Sensor API error: {message}")]
    #[diagnostic(code(vigia::api_error))]
    Api { message: String },

    #[error("Unexpected response from the sensor API: {message}")]
    #[diagnostic(
        code(vigia::decode),
        help(
            "The URL may point at something that is not the sensor API.\n\
             An expired tunnel often serves an HTML page in its place."
        )
    )]
    Decode { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vigia::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vigia::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: vigia config init --url <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No sensor API URL configured")]
    #[diagnostic(
        code(vigia::no_config),
        help(
            "Pass --url, set VIGIA_URL, or create a config file with:\n\
             vigia config init --url <URL>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(vigia::config))]
    Config(#[source] ConfigError),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => Self::ConnectionFailed { reason },

            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound { message } => Self::NotFound { message },

            CoreError::Decode { message } => Self::Decode { message },

            CoreError::Api { message, status } => Self::Api {
                message: match status {
                    Some(code) => format!("{message} (HTTP {code})"),
                    None => message,
                },
            },

            CoreError::Config { message } => Self::Validation {
                field: "url".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            other => Self::Config(other),
        }
    }
}
