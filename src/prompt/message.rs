//! Role-tagged chat messages accepted by the client.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End-user input.
    Human,
    /// Previous model output.
    Assistant,
    /// System instructions, forwarded through `--system-prompt`.
    System,
    /// Function call output.
    Function,
    /// Tool call output.
    Tool,
    /// Role-less chat input, treated like a user turn.
    Generic,
    /// Any role this crate does not know about.
    #[serde(untagged)]
    Other(String),
}

impl Role {
    /// Label prepended to the message text in the flattened prompt.
    #[must_use]
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::Human | Self::Generic => Some("User"),
            Self::Assistant => Some("Assistant"),
            Self::Function => Some("Function"),
            Self::Tool => Some("Tool"),
            Self::System => Some("System"),
            Self::Other(_) => None,
        }
    }
}

/// Function invocation carried by a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Raw JSON arguments as produced by the model.
    pub arguments: String,
}

/// A tool invocation requested by the model in an earlier turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(default)]
    pub function: Option<FunctionCall>,
}

/// The answer to an earlier tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub tool_call_id: String,
    #[serde(default)]
    pub name: String,
    pub content: String,
}

/// One piece of message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text.
    Text { text: String },
    /// A tool invocation request.
    ToolCall(ToolCall),
    /// A tool invocation result.
    ToolResult(ToolCallResponse),
    /// Image referenced by URL. Not supported by the CLI prompt.
    ImageUrl { url: String },
    /// Inline binary data. Not supported by the CLI prompt.
    Binary { mime_type: String, data: Vec<u8> },
}

impl ContentPart {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Short name of the part kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::ToolCall(_) => "tool_call",
            Self::ToolResult(_) => "tool_result",
            Self::ImageUrl { .. } => "image_url",
            Self::Binary { .. } => "binary",
        }
    }
}

/// A chat message: a role plus ordered content parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<ContentPart>,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, parts: Vec<ContentPart>) -> Self {
        Self { role, parts }
    }

    /// Single-part text message with the given role.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self::new(role, vec![ContentPart::text(text)])
    }

    pub fn human(text: impl Into<String>) -> Self {
        Self::text(Role::Human, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(Role::Assistant, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::text(Role::System, text)
    }
}
