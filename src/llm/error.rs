//! Error types for Claude Code calls.

use std::process::ExitStatus;

use tokio_util::codec::LinesCodecError;

/// Error type returned by caller-supplied streaming callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClaudeCodeError>;

/// Errors that can occur while driving the Claude Code CLI.
#[derive(thiserror::Error, Debug)]
pub enum ClaudeCodeError {
    /// The CLI binary was not found in `~/.local/bin` or on `PATH`.
    #[error("claude cli not found: {0}")]
    CliNotFound(#[source] which::Error),

    /// The formatted prompt was empty.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// A message carried a content part the CLI cannot receive.
    #[error("unsupported content part: {0}")]
    UnsupportedContent(&'static str),

    /// An option value was rejected at client construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The CLI process could not be started.
    #[error("failed to start claude cli: {0}")]
    Spawn(#[source] std::io::Error),

    /// A standard stream of the child was not piped.
    #[error("claude cli {0} pipe not available")]
    MissingPipe(&'static str),

    /// A stdout line was not a JSON object.
    #[error("failed to parse stream-json line: {source}")]
    ParseJson {
        /// The offending line.
        line: String,
        #[source]
        source: serde_json::Error,
    },

    /// An `assistant` line had a message shape that cannot be read.
    #[error("unsupported assistant content: {0}")]
    AssistantContent(String),

    /// The CLI emitted a line without a `type` discriminant.
    #[error("claude cli error: {0}")]
    CliReported(serde_json::Value),

    /// The streaming callback rejected a text chunk.
    #[error("streaming callback failed: {0}")]
    Streaming(#[source] BoxError),

    /// Reading stdout failed or a line exceeded the buffer limit.
    #[error("failed to read stdout: {0}")]
    StreamRead(#[source] LinesCodecError),

    /// Waiting on the child process failed.
    #[error("failed to wait for claude cli: {0}")]
    Wait(#[source] std::io::Error),

    /// The CLI exited with a non-zero status.
    #[error("{}", cli_failed_message(.status, .stderr))]
    CliFailed {
        /// Exit status of the process.
        status: ExitStatus,
        /// Trimmed stderr output, empty when nothing was written.
        stderr: String,
    },

    /// The call was cancelled through its cancellation token.
    #[error("claude code call cancelled")]
    Cancelled,
}

fn cli_failed_message(status: &ExitStatus, stderr: &str) -> String {
    if stderr.is_empty() {
        format!("claude cli failed: {status}")
    } else {
        format!("claude cli failed: {status}: {stderr}")
    }
}

impl ClaudeCodeError {
    /// Returns true if the error was raised before any process was started.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyPrompt | Self::UnsupportedContent(_) | Self::InvalidConfig(_)
        )
    }
}
