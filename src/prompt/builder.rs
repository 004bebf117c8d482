//! Flattening of chat messages into the CLI's system prompt and user prompt.

use crate::llm::{ClaudeCodeError, Result};

use super::{ContentPart, Message, Role};

/// The two strings handed to the CLI for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptParts {
    /// Value for `--system-prompt`; empty when there is none.
    pub system_prompt: String,
    /// Positional prompt passed after `--print --`.
    pub prompt: String,
}

impl PromptParts {
    /// Build the prompt parts for a call.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedContent` for parts the CLI cannot receive and
    /// `EmptyPrompt` if nothing but whitespace remains for the user turn.
    pub fn build(base_system_prompt: &str, messages: &[Message]) -> Result<Self> {
        let (extracted, others) = split_system_messages(messages)?;
        let system_prompt = merge_system_prompt(base_system_prompt, &extracted);
        let prompt = build_prompt(&others)?;
        if prompt.trim().is_empty() {
            return Err(ClaudeCodeError::EmptyPrompt);
        }
        Ok(Self {
            system_prompt,
            prompt,
        })
    }
}

/// Separate system messages from the rest of the conversation.
///
/// Returns the non-blank system texts joined by a blank line and the
/// remaining messages in their original order.
///
/// # Errors
///
/// Returns `UnsupportedContent` if a system message holds an unsupported part.
pub fn split_system_messages(messages: &[Message]) -> Result<(String, Vec<&Message>)> {
    let mut system_parts = Vec::new();
    let mut others = Vec::with_capacity(messages.len());

    for message in messages {
        if message.role == Role::System {
            let text = message_to_text(message)?;
            if !text.trim().is_empty() {
                system_parts.push(text);
            }
            continue;
        }
        others.push(message);
    }

    Ok((system_parts.join("\n\n"), others))
}

/// Combine the configured system prompt with system text taken from messages.
#[must_use]
pub fn merge_system_prompt(base: &str, extra: &str) -> String {
    let base = base.trim();
    let extra = extra.trim();
    match (base.is_empty(), extra.is_empty()) {
        (true, _) => extra.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}\n\n{extra}"),
    }
}

/// Render non-system messages as one role-prefixed prompt.
///
/// # Errors
///
/// Returns `UnsupportedContent` if a message holds an unsupported part.
pub fn build_prompt(messages: &[&Message]) -> Result<String> {
    let mut parts = Vec::with_capacity(messages.len());
    for message in messages {
        let text = message_to_text(message)?;
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        match message.role.prefix() {
            Some(prefix) => parts.push(format!("{prefix}: {text}")),
            None => parts.push(text.to_string()),
        }
    }
    Ok(parts.join("\n\n"))
}

/// Convert the parts of one message to plain text, one part per line.
///
/// # Errors
///
/// Returns `UnsupportedContent` for image and binary parts.
pub fn message_to_text(message: &Message) -> Result<String> {
    let mut rendered = Vec::with_capacity(message.parts.len());
    for part in &message.parts {
        let text = match part {
            ContentPart::Text { text } => text.clone(),
            ContentPart::ToolCall(call) => match &call.function {
                Some(function) => format!("[ToolCall] {} {}", function.name, function.arguments),
                None => "[ToolCall]".to_string(),
            },
            ContentPart::ToolResult(result) => {
                let name = result.name.trim();
                if name.is_empty() {
                    format!("[ToolResult] {}", result.content)
                } else {
                    format!("[ToolResult:{name}] {}", result.content)
                }
            }
            ContentPart::ImageUrl { .. } | ContentPart::Binary { .. } => {
                return Err(ClaudeCodeError::UnsupportedContent(part.kind()));
            }
        };
        rendered.push(text);
    }
    Ok(rendered.join("\n"))
}
