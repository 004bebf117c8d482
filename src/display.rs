//! Terminal display utilities.
//!
//! Truncation is shared with the tool summaries folded into responses;
//! the colored printers are used by the runner binary's `--show-tools`.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

use crate::tools::ToolEvent;

/// Format a timestamp in the same layout as tracing.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Maximum length for values shown next to a tool name.
const DEFAULT_MAX_LEN: usize = 80;

/// Truncate a string to at most `max_len` characters, ending in `...` if cut.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    }
}

/// Format tool input for a single display line.
#[must_use]
pub fn format_tool_input(input: &serde_json::Value) -> String {
    match input {
        serde_json::Value::Object(map) => {
            let pairs: Vec<String> = map
                .iter()
                .map(|(k, v)| {
                    let value_str = match v {
                        serde_json::Value::String(s) => truncate(s, 50),
                        other => truncate(&other.to_string(), 50),
                    };
                    format!("{k}={value_str}")
                })
                .collect();
            pairs.join(", ")
        }
        serde_json::Value::Null => String::new(),
        other => truncate(&other.to_string(), DEFAULT_MAX_LEN),
    }
}

/// Print a tool event to stderr.
pub fn print_tool_event(event: &ToolEvent) {
    let mut stderr = io::stderr().lock();
    let ts = format_timestamp(event.timestamp());
    let _ = match event {
        ToolEvent::ToolUse {
            tool_name, input, ..
        } => writeln!(
            stderr,
            "{} {} {} ({})",
            ts.dimmed(),
            "[TOOL]".cyan().bold(),
            tool_name.bold(),
            format_tool_input(input).dimmed()
        ),
        ToolEvent::ToolResult {
            tool_id, output, ..
        } => writeln!(
            stderr,
            "{} {} {} {}",
            ts.dimmed(),
            "[RESULT]".green().bold(),
            truncate(tool_id, 12).dimmed(),
            truncate(output, 150)
        ),
    };
    let _ = stderr.flush();
}
