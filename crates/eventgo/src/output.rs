//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Human output uses
//! `tabled` and `owo-colors`; structured formats use serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use eventgo_core::{Notification, OutcomeCategory};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

// ── Format selection ─────────────────────────────────────────────────

/// Output format after flags and `[defaults]` have been applied.
pub fn format(global: &GlobalOpts) -> OutputFormat {
    global.output.clone().unwrap_or_default()
}

/// Determine whether color output should be enabled.
pub fn should_color(global: &GlobalOpts) -> bool {
    match global.color.clone().unwrap_or_default() {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, which returns a pre-formatted string.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Render one operator notification.
///
/// Streaming-friendly: `json` still emits one document per notification,
/// `yaml` prefixes each with a `---` separator.
pub fn render_notification(format: &OutputFormat, note: &Notification, color: bool) -> String {
    match format {
        OutputFormat::Table => notification_line(note, color),
        OutputFormat::Json => render_json(note, false),
        OutputFormat::JsonCompact => render_json(note, true),
        OutputFormat::Yaml => format!("---\n{}", render_yaml(note).trim_end()),
        OutputFormat::Plain => format!("{}\t{}", note.outcome.kind(), note.request.code),
    }
}

fn notification_line(note: &Notification, color: bool) -> String {
    let time = note.at.with_timezone(&chrono::Local).format("%H:%M:%S");
    let text = &note.message;
    let mark = match note.category {
        OutcomeCategory::Success => "✓",
        OutcomeCategory::Duplicate => "!",
        OutcomeCategory::Error => "✗",
    };
    if !color {
        return format!("{time} {mark} {text}");
    }
    match note.category {
        OutcomeCategory::Success => format!("{} {} {}", time.dimmed(), mark.green(), text.green()),
        OutcomeCategory::Duplicate => {
            format!("{} {} {}", time.dimmed(), mark.yellow(), text.yellow())
        }
        OutcomeCategory::Error => format!("{} {} {}", time.dimmed(), mark.red(), text.red()),
    }
}

/// Render key/value rows as a two-column table.
pub fn render_detail(rows: &[(&str, String)]) -> String {
    #[derive(Tabled)]
    struct Row<'a> {
        #[tabled(rename = "Field")]
        field: &'a str,
        #[tabled(rename = "Value")]
        value: &'a str,
    }

    let rows: Vec<Row<'_>> = rows
        .iter()
        .map(|(field, value)| Row {
            field: *field,
            value: value.as_str(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
    let _ = stdout.flush();
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}
