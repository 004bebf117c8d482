//! Line types from Claude Code `--output-format stream-json` output.
//!
//! Each stdout line is a JSON object whose `type` field selects one of the
//! shapes below. Lines are validated when read; kinds this crate does not
//! consume are kept as [`StreamLine::Other`] and ignored by the parser.

use serde_json::{Map, Value};

use crate::llm::{
    ClaudeCodeError, GenerationInfo, Result, RESULT_KEY, STRUCTURED_OUTPUT_KEY,
    TOTAL_COST_USD_KEY, USAGE_KEY,
};

/// One content block of an assistant message, in stream order.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantBlock {
    /// A non-empty `text` block.
    Text(String),
    /// A `tool_use` block.
    ToolUse(ToolUse),
}

/// Tool use request inside an assistant message.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolUse {
    pub id: String,
    pub name: String,
    /// Tool input; `Null` when the block had no object input.
    pub input: Value,
}

/// Tool execution result line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Identifier matching the original tool use.
    pub tool_use_id: String,
    /// Result content; empty when the CLI sent a non-string value.
    pub content: String,
}

/// Final result line. Each field is `None` when absent from the line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultEvent {
    pub total_cost_usd: Option<Value>,
    pub usage: Option<Value>,
    pub result: Option<Value>,
    pub structured_output: Option<Value>,
}

impl ResultEvent {
    /// Copy the present fields into `info`, replacing earlier values.
    pub fn merge_into(self, info: &mut GenerationInfo) {
        let fields = [
            (TOTAL_COST_USD_KEY, self.total_cost_usd),
            (USAGE_KEY, self.usage),
            (RESULT_KEY, self.result),
            (STRUCTURED_OUTPUT_KEY, self.structured_output),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                info.insert(key.to_string(), value);
            }
        }
    }
}

/// A classified stdout line.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamLine {
    /// `assistant` message, blocks in the order they appeared.
    Assistant(Vec<AssistantBlock>),
    /// `tool_result` line.
    ToolResult(ToolResult),
    /// `result` line.
    Result(ResultEvent),
    /// Line with an empty or missing `type`: the CLI reporting an error.
    CliError(Value),
    /// Any other discriminant (`system`, `stream_event`, ...).
    Other(String),
}

impl StreamLine {
    /// Parse one trimmed, non-empty stdout line.
    ///
    /// # Errors
    ///
    /// Returns `ParseJson` if the line is not a JSON object.
    pub fn parse(line: &str) -> Result<(String, Map<String, Value>)> {
        let payload: Map<String, Value> =
            serde_json::from_str(line).map_err(|source| ClaudeCodeError::ParseJson {
                line: line.to_string(),
                source,
            })?;
        let msg_type = string_field(&payload, "type");
        Ok((msg_type, payload))
    }

    /// Classify a parsed payload by its `type` discriminant.
    ///
    /// # Errors
    ///
    /// Returns `AssistantContent` if an `assistant` line lacks a readable
    /// `message.content`.
    pub fn classify(msg_type: &str, payload: Map<String, Value>) -> Result<Self> {
        match msg_type {
            "assistant" => parse_assistant(&payload).map(Self::Assistant),
            "tool_result" => Ok(Self::ToolResult(ToolResult {
                tool_use_id: string_field(&payload, "tool_use_id"),
                content: string_field(&payload, "content"),
            })),
            "result" => Ok(Self::Result(ResultEvent {
                total_cost_usd: payload.get("total_cost_usd").cloned(),
                usage: payload.get("usage").cloned(),
                result: payload.get("result").cloned(),
                structured_output: payload.get("structured_output").cloned(),
            })),
            "" => Ok(Self::CliError(Value::Object(payload))),
            other => Ok(Self::Other(other.to_string())),
        }
    }

    /// Parse and classify a line in one step.
    ///
    /// # Errors
    ///
    /// See [`StreamLine::parse`] and [`StreamLine::classify`].
    pub fn from_line(line: &str) -> Result<Self> {
        let (msg_type, payload) = Self::parse(line)?;
        Self::classify(&msg_type, payload)
    }
}

/// Read a string field, treating absent or non-string values as empty.
fn string_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn parse_assistant(payload: &Map<String, Value>) -> Result<Vec<AssistantBlock>> {
    let message = payload
        .get("message")
        .and_then(Value::as_object)
        .ok_or_else(|| ClaudeCodeError::AssistantContent("missing 'message'".to_string()))?;
    let content = message
        .get("content")
        .ok_or_else(|| ClaudeCodeError::AssistantContent("missing 'content'".to_string()))?;

    match content {
        Value::String(text) if text.is_empty() => Ok(Vec::new()),
        Value::String(text) => Ok(vec![AssistantBlock::Text(text.clone())]),
        Value::Array(blocks) => Ok(blocks.iter().filter_map(parse_block).collect()),
        other => Err(ClaudeCodeError::AssistantContent(format!(
            "content is {}",
            json_kind(other)
        ))),
    }
}

fn parse_block(block: &Value) -> Option<AssistantBlock> {
    let block = block.as_object()?;
    match block.get("type").and_then(Value::as_str)? {
        "text" => {
            let text = string_field(block, "text");
            (!text.is_empty()).then_some(AssistantBlock::Text(text))
        }
        "tool_use" => Some(AssistantBlock::ToolUse(ToolUse {
            id: string_field(block, "id"),
            name: string_field(block, "name"),
            input: block
                .get("input")
                .filter(|input| input.is_object())
                .cloned()
                .unwrap_or(Value::Null),
        })),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
