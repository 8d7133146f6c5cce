//! `vigia`: command-line client for a PIR motion-sensor API.

mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use vigia_core::Monitor;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Map -v counts to a default filter; `RUST_LOG` wins when set.
/// Diagnostics go to stderr so stdout stays parseable.
fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config management never touches the network.
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "vigia", &mut std::io::stdout());
            Ok(())
        }

        // Everything else resolves a profile and goes through a monitor.
        cmd => {
            let monitor_config = config::resolve_monitor_config(&cli.global)?;
            tracing::debug!(url = %monitor_config.api_url, "resolved sensor endpoint");

            let monitor = Monitor::new(monitor_config)?;
            commands::dispatch(cmd, &monitor, &cli.global).await
        }
    }
}
