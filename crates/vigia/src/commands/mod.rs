//! Command handlers, one module per command group.

pub mod config_cmd;
pub mod events;
pub mod health;
pub mod report;
pub mod stats;

use vigia_core::Monitor;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    monitor: &Monitor,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Stats => stats::handle(monitor, global).await,
        Command::Events(args) => events::handle(monitor, args, global).await,
        Command::Report { description } => report::handle(monitor, &description, global).await,
        Command::Health => health::handle(monitor, global).await,
        // Handled in run() before a monitor is ever built.
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
