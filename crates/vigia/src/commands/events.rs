//! `vigia events`: list and inspect recorded motion events.

use chrono::Utc;
use serde::Serialize;
use tabled::Tabled;

use vigia_core::{Monitor, MotionEvent, Pagination, humanize};

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Time (UTC)")]
    time: String,
}

impl From<&MotionEvent> for EventRow {
    fn from(event: &MotionEvent) -> Self {
        Self {
            id: event.id,
            description: event.description.clone(),
            when: humanize::time_ago(event.occurred_at, Utc::now()),
            time: event.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// List payload that keeps the server's pagination block attached for
/// structured output.
#[derive(Serialize)]
struct EventsPage<'a> {
    events: &'a [MotionEvent],
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<&'a Pagination>,
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    monitor: &Monitor,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List { page, limit } => list(monitor, page, limit, global).await,
        EventsCommand::Get { id } => get(monitor, id, global).await,
    }
}

async fn list(
    monitor: &Monitor,
    page: u32,
    limit: u32,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (events, pagination) = monitor.fetch_movements(page, limit).await?;

    let out = match global.output {
        // Structured formats carry pagination alongside the events.
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            let payload = EventsPage {
                events: &events,
                pagination: pagination.as_ref(),
            };
            match global.output {
                OutputFormat::JsonCompact => output::render_json_compact(&payload),
                OutputFormat::Yaml => output::render_yaml(&payload),
                _ => output::render_json_pretty(&payload),
            }
        }
        _ => {
            let mut out =
                output::render_list(&global.output, &events, |e| EventRow::from(e), |e| {
                    e.id.to_string()
                });
            if let (OutputFormat::Table, Some(p)) = (&global.output, &pagination) {
                out.push_str(&format!(
                    "\npage {} of {} ({} events total)",
                    p.page, p.total_pages, p.total
                ));
            }
            out
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

async fn get(monitor: &Monitor, id: u64, global: &GlobalOpts) -> Result<(), CliError> {
    let event = monitor.fetch_movement(id).await?;
    let out = output::render_single(&global.output, &event, detail, |e| e.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(event: &MotionEvent) -> String {
    format!(
        "ID           {}\n\
         Description  {}\n\
         When         {}\n\
         Time (UTC)   {}",
        event.id,
        event.description,
        humanize::time_ago(event.occurred_at, Utc::now()),
        event.occurred_at.format("%Y-%m-%d %H:%M:%S"),
    )
}
