//! CLI configuration: a thin wrapper around `vigia_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--url, --profile, --timeout).

use vigia_core::MonitorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use vigia_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build a `MonitorConfig` from the config file, profile, and CLI flag
/// overrides.
///
/// This is the single boundary where CLI flags cross into core
/// configuration. Works without a config file when --url (or
/// `VIGIA_URL`) supplies the endpoint.
pub fn resolve_monitor_config(global: &GlobalOpts) -> Result<MonitorConfig, CliError> {
    let cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),

        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            let available: Vec<_> = cfg.profiles.keys().cloned().collect();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }

        // No profile configured: the URL flag alone is enough.
        None => {
            let Some(ref url) = global.url else {
                return Err(CliError::NoConfig {
                    path: config_path().display().to_string(),
                });
            };
            Profile::new(url.clone())
        }
    };

    // Flag overrides take priority over profile values.
    if let Some(ref url) = global.url {
        profile.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    Ok(vigia_config::profile_to_monitor_config(
        &profile,
        &cfg.defaults,
    )?)
}
