//! Tool invocation events observed in the CLI stream.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Callback invoked for every tool event, whatever the output mode.
pub type ToolEventHook = Arc<dyn Fn(&ToolEvent) + Send + Sync>;

/// Kind of a [`ToolEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolEventKind {
    /// The agent asked for a tool to run.
    ToolUse,
    /// A tool finished and produced output.
    ToolResult,
}

impl fmt::Display for ToolEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolUse => f.write_str("tool_use"),
            Self::ToolResult => f.write_str("tool_result"),
        }
    }
}

/// A tool request or completion reported by the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolEvent {
    /// A `tool_use` block inside an assistant message.
    ToolUse {
        tool_name: String,
        tool_id: String,
        /// Tool input; `Null` when the block carried no object input.
        input: serde_json::Value,
        timestamp: DateTime<Utc>,
    },
    /// A `tool_result` line.
    ToolResult {
        tool_id: String,
        output: String,
        timestamp: DateTime<Utc>,
    },
}

impl ToolEvent {
    /// Create a tool request event stamped with the current time.
    pub fn tool_use(
        tool_name: impl Into<String>,
        tool_id: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        Self::ToolUse {
            tool_name: tool_name.into(),
            tool_id: tool_id.into(),
            input,
            timestamp: Utc::now(),
        }
    }

    /// Create a tool completion event stamped with the current time.
    pub fn tool_result(tool_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_id: tool_id.into(),
            output: output.into(),
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ToolEventKind {
        match self {
            Self::ToolUse { .. } => ToolEventKind::ToolUse,
            Self::ToolResult { .. } => ToolEventKind::ToolResult,
        }
    }

    #[must_use]
    pub fn tool_id(&self) -> &str {
        match self {
            Self::ToolUse { tool_id, .. } | Self::ToolResult { tool_id, .. } => tool_id,
        }
    }

    /// Tool name, only known for requests.
    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::ToolUse { tool_name, .. } => Some(tool_name),
            Self::ToolResult { .. } => None,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ToolUse { timestamp, .. } | Self::ToolResult { timestamp, .. } => *timestamp,
        }
    }
}
