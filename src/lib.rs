//! Claude Code LLM - a chat model backed by the Claude Code CLI.
//!
//! Each call renders the conversation into a prompt, runs
//! `claude --print` with `stream-json` output, and collects the assistant
//! text and result metadata from the stream.

pub mod cli;
pub mod config;
pub mod display;
pub mod llm;
pub mod prompt;
pub mod tools;

pub use config::{ClaudeCodeOptions, OutputMode};
pub use llm::{
    CallOptions, ClaudeCodeError, ClaudeCodeLlm, ContentResponse, LanguageModel, StreamingFunc,
};
pub use prompt::{ContentPart, Message, Role};
pub use tools::{ToolEvent, ToolEventHook};
