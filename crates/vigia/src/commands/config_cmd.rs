//! `vigia config`: profile management.
//!
//! Pure file operations; none of these touch the network.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { url, name } => {
            vigia_config::validate_url(&url)?;

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(name.clone(), Profile::new(url));
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;

            eprintln!(
                "✓ Configuration written to {}",
                config::config_path().display()
            );
            eprintln!("  Active profile: {name}");
            eprintln!("\n  Try it: vigia health");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(|| Profile::new(""));

            match key.as_str() {
                "url" | "api-url" | "api_url" => {
                    vigia_config::validate_url(&value)?;
                    profile.api_url = value;
                }
                "timeout" => profile.timeout = Some(parse_num(&key, &value)?),
                "stats-interval" | "stats_interval" => {
                    profile.stats_interval_secs = Some(parse_num(&key, &value)?);
                }
                "events-interval" | "events_interval" => {
                    profile.events_interval_secs = Some(parse_num(&key, &value)?);
                }
                "chart-interval" | "chart_interval" => {
                    profile.chart_interval_secs = Some(parse_num(&key, &value)?);
                }
                "recent-capacity" | "recent_capacity" => {
                    profile.recent_capacity = Some(parse_num(&key, &value)?);
                }
                "chart-fetch-limit" | "chart_fetch_limit" => {
                    profile.chart_fetch_limit = Some(parse_num(&key, &value)?);
                }
                "active-window" | "active_window" => {
                    profile.active_window_secs = Some(parse_num(&key, &value)?);
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: url, timeout, \
                             stats-interval, events-interval, chart-interval, \
                             recent-capacity, chart-fetch-limit, active-window"
                        ),
                    });
                }
            }

            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: vigia config init --url <URL>");
                return Ok(());
            }

            let default = cfg.default_profile.as_deref().unwrap_or("default");
            let mut sorted: Vec<_> = cfg.profiles.keys().collect();
            sorted.sort();
            for profile_name in sorted {
                let marker = if profile_name.as_str() == default {
                    " *"
                } else {
                    ""
                };
                println!("{profile_name}{marker}");
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
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

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}

/// Parse a numeric config value with a field-tagged validation error.
fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: key.into(),
        reason: format!("'{value}' is not a number"),
    })
}
