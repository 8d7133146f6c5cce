//! `vigia health`: probe the sensor API.
//!
//! A failing probe propagates as an error, so scripts get exit code 7
//! for an unreachable sensor, 8 for a timeout, and 1 for a server-side
//! failure.

use owo_colors::OwoColorize;

use vigia_core::{HealthReport, Monitor};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    let report = monitor.check_health().await?;
    let color = output::should_color(&global.color);

    let out = output::render_single(
        &global.output,
        &report,
        |r| detail(r, color),
        |_| "ok".into(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(report: &HealthReport, color: bool) -> String {
    let mark = if color {
        "✓".green().to_string()
    } else {
        "✓".into()
    };
    match report.message {
        Some(ref message) => format!("{mark} {message}"),
        None => format!("{mark} Sensor API is healthy"),
    }
}
