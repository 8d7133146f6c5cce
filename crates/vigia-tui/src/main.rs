//! vigia-tui: live terminal dashboard for a PIR motion sensor API.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::bail;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use vigia_core::{Monitor, MonitorConfig};

use crate::app::App;
use crate::tui::Tui;

#[derive(Debug, Parser)]
#[command(
    name = "vigia-tui",
    version,
    about = "Live terminal dashboard for PIR motion telemetry"
)]
struct Cli {
    /// Sensor API base URL (overrides the configured profile).
    #[arg(short, long, env = "VIGIA_URL")]
    url: Option<String>,

    /// Named profile from the vigia config file.
    #[arg(short, long, env = "VIGIA_PROFILE")]
    profile: Option<String>,

    /// Where to write logs (stdout belongs to the dashboard).
    #[arg(long, default_value = "/tmp/vigia-tui.log")]
    log_file: PathBuf,

    /// Log verbosity: -v info, -vv debug, -vvv trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    tui::install_hooks()?;
    let cli = Cli::parse();
    let _guard = init_tracing(&cli);

    // Resolve configuration before touching the terminal so failures
    // print as plain errors, not inside the alternate screen.
    let config = resolve_monitor_config(&cli)?;
    tracing::info!(url = %config.api_url, "starting dashboard");
    let monitor = Monitor::new(config)?;

    let mut tui = Tui::new()?;
    tui.enter()?;
    let result = App::new(monitor).run(&mut tui).await;
    tui.exit()?;
    result
}

fn init_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vigia_tui={level},vigia_core={level}")));

    let dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file = cli
        .log_file
        .file_name()
        .unwrap_or_else(|| OsStr::new("vigia-tui.log"));
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

/// Flags beat the profile, the profile beats built-in defaults. Same
/// resolution order as the CLI.
fn resolve_monitor_config(cli: &Cli) -> Result<MonitorConfig> {
    let cfg = vigia_config::load_config_or_default();
    let name = cfg.active_profile_name(cli.profile.as_deref());

    let mut profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if cli.profile.is_some() => {
            bail!(
                "profile '{name}' is not defined; `vigia config profiles` lists the available ones"
            )
        }
        None => {
            let Some(url) = cli.url.clone() else {
                bail!(
                    "no sensor URL configured; pass --url <URL> or run \
                     `vigia config init --url <URL>` first"
                );
            };
            vigia_config::Profile::new(url)
        }
    };
    if let Some(url) = &cli.url {
        profile.api_url.clone_from(url);
    }
    Ok(vigia_config::profile_to_monitor_config(&profile, &cfg.defaults)?)
}
