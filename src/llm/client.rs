//! Language model backed by the Claude Code CLI.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::cli::{find_cli, ClaudeProcess, CommandBuilder, StreamParser};
use crate::config::ClaudeCodeOptions;
use crate::prompt::{Message, PromptParts};

use super::{CallOptions, ClaudeCodeError, ContentResponse, Result};

/// A chat model that answers through one-shot Claude Code CLI runs.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a response for the conversation in `messages`.
    async fn generate_content(
        &self,
        messages: &[Message],
        options: CallOptions,
    ) -> Result<ContentResponse>;

    /// Send a single user prompt and return the response text.
    async fn call(&self, prompt: &str, options: CallOptions) -> Result<String> {
        let messages = [Message::human(prompt)];
        let response = self.generate_content(&messages, options).await?;
        Ok(response.text)
    }
}

/// Claude Code CLI client.
///
/// Each call spawns its own `claude` process; nothing is shared between
/// calls except the options and the resolved binary path.
#[derive(Debug, Clone)]
pub struct ClaudeCodeLlm {
    cli_path: PathBuf,
    options: ClaudeCodeOptions,
}

impl ClaudeCodeLlm {
    /// Create a client, resolving the CLI binary once.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a session id that is not a UUID and
    /// `CliNotFound` when no binary path is set and none can be found.
    pub fn new(options: ClaudeCodeOptions) -> Result<Self> {
        validate_session_id(options.get_session_id())?;

        let cli_path = match options.get_cli_path() {
            Some(path) => path.to_path_buf(),
            None => find_cli()?,
        };
        tracing::debug!(cli = %cli_path.display(), "Resolved claude cli");

        Ok(Self { cli_path, options })
    }

    /// Path of the binary used for every call.
    #[must_use]
    pub fn cli_path(&self) -> &Path {
        &self.cli_path
    }

    #[must_use]
    pub fn options(&self) -> &ClaudeCodeOptions {
        &self.options
    }

    /// Run the CLI once for `messages` and collect its response.
    ///
    /// System messages are merged into the configured system prompt; the
    /// rest become the prompt text.
    ///
    /// # Errors
    ///
    /// Returns a validation error before spawning, or the first process,
    /// stream or exit error. Partial output is discarded on error.
    pub async fn generate_content(
        &self,
        messages: &[Message],
        options: CallOptions,
    ) -> Result<ContentResponse> {
        let parts = PromptParts::build(self.options.get_system_prompt(), messages)?;
        if options.is_cancelled() {
            return Err(ClaudeCodeError::Cancelled);
        }

        let command = CommandBuilder::new(&self.options, &parts.system_prompt, &parts.prompt);
        let mut process = ClaudeProcess::spawn(&self.cli_path, &command)?;
        let Some(stdout) = process.take_stdout() else {
            process.kill_and_drain().await;
            return Err(ClaudeCodeError::MissingPipe("stdout"));
        };

        let cancel = options.cancel.unwrap_or_else(CancellationToken::new);
        let parser = StreamParser::from_options(&self.options)
            .streaming(options.streaming_func.as_ref());

        let read = tokio::select! {
            biased;

            () = cancel.cancelled() => None,
            result = parser.read(stdout) => Some(result),
        };

        let output = match read {
            Some(Ok(output)) => output,
            Some(Err(failure)) => {
                let stderr = process.kill_and_drain().await;
                tracing::debug!(
                    partial_len = failure.partial.text.len(),
                    stderr = %stderr,
                    "claude stream failed, process killed"
                );
                return Err(failure.into());
            }
            None => {
                tracing::info!("Call cancelled while reading claude output");
                process.kill_and_drain().await;
                return Err(ClaudeCodeError::Cancelled);
            }
        };

        process.wait_for_exit(&cancel).await?;

        Ok(ContentResponse {
            text: output.text,
            generation_info: output.generation_info,
        })
    }

    /// Send a single user prompt and return the response text.
    ///
    /// # Errors
    ///
    /// See [`ClaudeCodeLlm::generate_content`].
    pub async fn call(&self, prompt: &str, options: CallOptions) -> Result<String> {
        let response = self
            .generate_content(&[Message::human(prompt)], options)
            .await?;
        Ok(response.text)
    }
}

#[async_trait]
impl LanguageModel for ClaudeCodeLlm {
    async fn generate_content(
        &self,
        messages: &[Message],
        options: CallOptions,
    ) -> Result<ContentResponse> {
        ClaudeCodeLlm::generate_content(self, messages, options).await
    }

    async fn call(&self, prompt: &str, options: CallOptions) -> Result<String> {
        ClaudeCodeLlm::call(self, prompt, options).await
    }
}

fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.is_empty() {
        return Ok(());
    }
    uuid::Uuid::parse_str(session_id)
        .map(|_| ())
        .map_err(|e| ClaudeCodeError::InvalidConfig(format!("session id {session_id:?}: {e}")))
}
