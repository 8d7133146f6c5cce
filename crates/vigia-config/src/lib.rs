//! Shared configuration for the vigia CLI and TUI.
//!
//! TOML profiles under the platform config dir, merged with `VIGIA_*`
//! environment overrides, and translation to `vigia_core::MonitorConfig`.
//! Both binaries depend on this crate; the CLI adds flag-aware
//! wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vigia_core::MonitorConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{name}'")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named sensor API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile name to use: the requested one, else
    /// `default_profile`, else literally `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(ToOwned::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

/// A named sensor API profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Sensor API base URL (e.g., "https://abc123.ngrok-free.app").
    pub api_url: String,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Aggregate-counters poll cadence (seconds).
    pub stats_interval_secs: Option<u64>,

    /// Recent-events poll cadence (seconds).
    pub events_interval_secs: Option<u64>,

    /// Hourly-chart poll cadence (seconds).
    pub chart_interval_secs: Option<u64>,

    /// How many recent detections the log retains.
    pub recent_capacity: Option<usize>,

    /// Page size for the chart poller's wider fetch.
    pub chart_fetch_limit: Option<u32>,

    /// Recency window for the "active" state (seconds).
    pub active_window_secs: Option<u64>,
}

impl Profile {
    /// A profile pointing at `api_url` with everything else defaulted.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: None,
            stats_interval_secs: None,
            events_interval_secs: None,
            chart_interval_secs: None,
            recent_capacity: None,
            chart_fetch_limit: None,
            active_window_secs: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "vigia", "vigia").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vigia");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn build_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VIGIA_").split("_"))
}

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let config: Config = build_figment(&config_path()).extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Translation to MonitorConfig ────────────────────────────────────

/// Build a `MonitorConfig` from a profile, without CLI flag overrides.
///
/// Suitable for the TUI and other non-CLI consumers. Unset profile
/// fields fall back to the monitor's stock cadences.
pub fn profile_to_monitor_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<MonitorConfig, ConfigError> {
    validate_url(&profile.api_url)?;
    validate_intervals(profile)?;

    let base = MonitorConfig::default();
    Ok(MonitorConfig {
        api_url: profile.api_url.clone(),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        stats_interval: profile
            .stats_interval_secs
            .map_or(base.stats_interval, Duration::from_secs),
        events_interval: profile
            .events_interval_secs
            .map_or(base.events_interval, Duration::from_secs),
        chart_interval: profile
            .chart_interval_secs
            .map_or(base.chart_interval, Duration::from_secs),
        recent_capacity: profile.recent_capacity.unwrap_or(base.recent_capacity),
        chart_fetch_limit: profile.chart_fetch_limit.unwrap_or(base.chart_fetch_limit),
        active_window: profile
            .active_window_secs
            .map_or(base.active_window, Duration::from_secs),
    })
}

/// Check a URL parses before handing it to the HTTP client.
pub fn validate_url(raw: &str) -> Result<(), ConfigError> {
    raw.parse::<url::Url>()
        .map(|_| ())
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {raw}"),
        })
}

/// A zero interval would make the pollers spin (and `tokio::time::interval`
/// rejects a zero period), so refuse it up front.
fn validate_intervals(profile: &Profile) -> Result<(), ConfigError> {
    let seconds = [
        ("timeout", profile.timeout),
        ("stats_interval_secs", profile.stats_interval_secs),
        ("events_interval_secs", profile.events_interval_secs),
        ("chart_interval_secs", profile.chart_interval_secs),
        ("active_window_secs", profile.active_window_secs),
    ];
    for (field, value) in seconds {
        if value == Some(0) {
            return Err(ConfigError::Validation {
                field: field.into(),
                reason: "must be at least 1 second".into(),
            });
        }
    }
    if profile.recent_capacity == Some(0) {
        return Err(ConfigError::Validation {
            field: "recent_capacity".into(),
            reason: "must be at least 1".into(),
        });
    }
    if profile.chart_fetch_limit == Some(0) {
        return Err(ConfigError::Validation {
            field: "chart_fetch_limit".into(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(())
}
