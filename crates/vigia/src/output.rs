//! Output rendering: table, JSON, YAML, plain.
//!
//! Every command funnels its result through [`render_list`] or
//! [`render_single`] so the --output flag behaves the same everywhere.
//! Plain mode emits one identifier per line for shell pipelines.

use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Decide whether to emit ANSI colors for human-facing output.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a list of items in the requested format.
///
/// `to_row` maps an item to its table row, `id_of` to the identifier
/// printed in plain mode.
pub fn render_list<T, R>(
    format: &OutputFormat,
    items: &[T],
    to_row: impl Fn(&T) -> R,
    id_of: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(&items),
        OutputFormat::JsonCompact => render_json_compact(&items),
        OutputFormat::Yaml => render_yaml(&items),
        OutputFormat::Plain => items
            .iter()
            .map(id_of)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render a single item in the requested format.
///
/// `detail` produces the human-readable table/detail view, `id_of` the
/// plain-mode identifier.
pub fn render_single<T>(
    format: &OutputFormat,
    item: &T,
    detail: impl Fn(&T) -> String,
    id_of: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => detail(item),
        OutputFormat::Json => render_json_pretty(item),
        OutputFormat::JsonCompact => render_json_compact(item),
        OutputFormat::Yaml => render_yaml(item),
        OutputFormat::Plain => id_of(item),
    }
}

/// Print rendered output to stdout unless --quiet is set.
pub fn print_output(out: &str, quiet: bool) {
    if quiet || out.is_empty() {
        return;
    }
    // Ignore broken pipes from `vigia events list | head`.
    let _ = writeln!(io::stdout(), "{out}");
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    if rows.is_empty() {
        return "(no results)".into();
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn render_json_pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("serialization error: {e}"))
}

pub fn render_json_compact<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("serialization error: {e}"))
}

pub fn render_yaml<T: Serialize>(value: &T) -> String {
    serde_yaml::to_string(value).unwrap_or_else(|e| format!("serialization error: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: u64,
        name: String,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: u64,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                name: "first".into(),
            },
            Item {
                id: 2,
                name: "second".into(),
            },
        ]
    }

    #[test]
    fn plain_lists_one_id_per_line() {
        let out = render_list(
            &OutputFormat::Plain,
            &items(),
            |i| ItemRow { id: i.id },
            |i| i.id.to_string(),
        );
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn json_list_is_valid() {
        let out = render_list(
            &OutputFormat::Json,
            &items(),
            |i| ItemRow { id: i.id },
            |i| i.id.to_string(),
        );
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[1]["name"], "second");
    }

    #[test]
    fn empty_table_has_placeholder() {
        let out = render_list(
            &OutputFormat::Table,
            &Vec::<Item>::new(),
            |i| ItemRow { id: i.id },
            |i| i.id.to_string(),
        );
        assert_eq!(out, "(no results)");
    }

    #[test]
    fn single_uses_detail_for_table() {
        let item = Item {
            id: 7,
            name: "solo".into(),
        };
        let out = render_single(
            &OutputFormat::Table,
            &item,
            |i| format!("Item {}", i.id),
            |i| i.id.to_string(),
        );
        assert_eq!(out, "Item 7");
    }

    #[test]
    fn yaml_single_round_trips() {
        let item = Item {
            id: 9,
            name: "yaml".into(),
        };
        let out = render_single(
            &OutputFormat::Yaml,
            &item,
            |_| String::new(),
            |_| String::new(),
        );
        assert!(out.contains("id: 9"));
        assert!(out.contains("name: yaml"));
    }
}
