//! `vigia stats`: aggregate counters and activity state.

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

use vigia_core::{ActivityState, Monitor, MotionStats, humanize};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Stats payload with the derived activity state attached, so JSON and
/// YAML consumers see the same judgement the table shows.
#[derive(Serialize)]
struct StatsView {
    #[serde(flatten)]
    stats: MotionStats,
    activity: ActivityState,
}

pub async fn handle(monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = monitor.fetch_stats().await?;
    let now = Utc::now();
    let activity = stats.activity(monitor.config().active_window, now);
    let color = output::should_color(&global.color);

    let view = StatsView { stats, activity };
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, now, color),
        |v| v.activity.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(view: &StatsView, now: DateTime<Utc>, color: bool) -> String {
    let last = match view.stats.last_motion {
        Some(ts) => format!(
            "{} ({} UTC)",
            humanize::time_ago(ts, now),
            ts.format("%Y-%m-%d %H:%M:%S")
        ),
        None => "never".into(),
    };

    let activity = match view.activity {
        ActivityState::Active if color => "● active".green().to_string(),
        ActivityState::Active => "● active".into(),
        ActivityState::Idle if color => "○ idle".yellow().to_string(),
        ActivityState::Idle => "○ idle".into(),
    };

    format!(
        "Total detections  {}\n\
         Today             {}\n\
         This week         {}\n\
         Last motion       {}\n\
         Activity          {}",
        view.stats.total, view.stats.today, view.stats.week, last, activity,
    )
}
