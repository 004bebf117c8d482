//! Text summaries of tool events for the verbose and full output modes.

use serde_json::Value;

use crate::config::OutputMode;
use crate::display::truncate;

use super::ToolEvent;

/// Longest shell command shown in a verbose summary.
const COMMAND_MAX_LEN: usize = 80;

/// Longest fallback detail shown in a verbose summary.
const DETAIL_MAX_LEN: usize = 60;

/// Characters of tool output kept in full mode.
const RESULT_MAX_LEN: usize = 500;

/// Keys tried, in order, for tools without a dedicated rule.
const FALLBACK_KEYS: [&str; 6] = ["path", "file", "command", "query", "name", "url"];

/// Render the text appended to the response for `event`, if any.
#[must_use]
pub fn render_tool_event(mode: OutputMode, event: &ToolEvent) -> Option<String> {
    match (mode, event) {
        (OutputMode::Text, _) | (OutputMode::Verbose, ToolEvent::ToolResult { .. }) => None,
        (
            OutputMode::Verbose,
            ToolEvent::ToolUse {
                tool_name, input, ..
            },
        ) => Some(format_tool_use_summary(tool_name, input)),
        (
            OutputMode::Full,
            ToolEvent::ToolUse {
                tool_name,
                tool_id,
                input,
                ..
            },
        ) => {
            let pretty = serde_json::to_string_pretty(input).unwrap_or_default();
            Some(format!("\n🔧 [{tool_name}] {tool_id}\n{pretty}\n"))
        }
        (OutputMode::Full, ToolEvent::ToolResult { output, .. }) => {
            Some(format!("  └─ 📤 {}\n", truncate_output(output)))
        }
    }
}

/// One-line summary of a tool request: the tool name plus its key argument.
#[must_use]
pub fn format_tool_use_summary(tool_name: &str, input: &Value) -> String {
    match tool_use_detail(tool_name, input) {
        Some(detail) => format!("\n🔧 {tool_name}: {detail}\n"),
        None => format!("\n🔧 {tool_name}\n"),
    }
}

fn str_field<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
    input.get(key).and_then(Value::as_str)
}

fn tool_use_detail(tool_name: &str, input: &Value) -> Option<String> {
    let detail = match tool_name {
        "Read" | "read_file" | "view_file" | "Write" | "write_file" | "create_file" => {
            str_field(input, "file_path")
                .or_else(|| str_field(input, "path"))
                .map(str::to_string)
        }
        "Bash" | "run_command" | "execute_command" => {
            str_field(input, "command").map(|cmd| truncate(cmd, COMMAND_MAX_LEN))
        }
        "TodoWrite" | "task" | "plan" => match input.get("todos") {
            Some(Value::String(todos)) => Some(format!("{} items", todos.split('\n').count())),
            Some(Value::Array(todos)) => Some(format!("{} items", todos.len())),
            _ => None,
        },
        "Skill" | "use_skill" => str_field(input, "skill_name")
            .or_else(|| str_field(input, "name"))
            .map(str::to_string),
        "Search" | "grep" | "find" => str_field(input, "query")
            .or_else(|| str_field(input, "pattern"))
            .map(str::to_string),
        _ => FALLBACK_KEYS
            .iter()
            .filter_map(|key| str_field(input, key))
            .find(|value| !value.is_empty())
            .map(|value| truncate(value, DETAIL_MAX_LEN)),
    };
    detail.filter(|d| !d.is_empty())
}

fn truncate_output(output: &str) -> String {
    if output.chars().count() <= RESULT_MAX_LEN {
        return output.to_string();
    }
    let kept: String = output.chars().take(RESULT_MAX_LEN).collect();
    format!("{kept}... (truncated)")
}
