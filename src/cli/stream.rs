//! Stream parser for Claude Code stdout.
//!
//! Reads `stream-json` lines, accumulates assistant text and result
//! metadata, and forwards tool events to the configured hook and output
//! mode.

use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};

use crate::config::{ClaudeCodeOptions, OutputMode, DEFAULT_MAX_BUFFER_SIZE};
use crate::llm::{ClaudeCodeError, GenerationInfo, Result, StreamingFunc};
use crate::tools::{render_tool_event, ToolEvent, ToolEventHook};

use super::{AssistantBlock, StreamLine};

/// Text and metadata collected from a complete stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamOutput {
    /// Concatenated assistant text and tool summaries.
    pub text: String,
    /// Fields merged from `result` lines.
    pub generation_info: GenerationInfo,
}

/// A stream that stopped early, with what had been read before the failure.
#[derive(Debug)]
pub struct StreamFailure {
    pub partial: StreamOutput,
    pub error: ClaudeCodeError,
}

impl From<StreamFailure> for ClaudeCodeError {
    fn from(failure: StreamFailure) -> Self {
        failure.error
    }
}

/// Line-by-line parser for one call's stdout.
#[derive(Clone, Copy)]
pub struct StreamParser<'a> {
    max_line_length: usize,
    output_mode: OutputMode,
    hook: Option<&'a ToolEventHook>,
    streaming: Option<&'a StreamingFunc>,
}

impl Default for StreamParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> StreamParser<'a> {
    /// Create a text-only parser with the default line limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_BUFFER_SIZE,
            output_mode: OutputMode::Text,
            hook: None,
            streaming: None,
        }
    }

    /// Create a parser configured from client options.
    #[must_use]
    pub fn from_options(options: &'a ClaudeCodeOptions) -> Self {
        Self {
            max_line_length: options.get_max_buffer_size(),
            output_mode: options.get_output_mode(),
            hook: options.get_tool_event_hook(),
            streaming: None,
        }
    }

    /// Set the longest accepted line, in bytes.
    #[must_use]
    pub fn max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    /// Set how tool events are rendered into the output.
    #[must_use]
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Set the hook invoked for every tool event.
    #[must_use]
    pub fn hook(mut self, hook: Option<&'a ToolEventHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Set the callback receiving text chunks as they are read.
    #[must_use]
    pub fn streaming(mut self, streaming: Option<&'a StreamingFunc>) -> Self {
        self.streaming = streaming;
        self
    }

    /// Read `reader` to the end.
    ///
    /// # Errors
    ///
    /// Returns a [`StreamFailure`] holding the partial output on the first
    /// read, parse, CLI-reported or callback error.
    pub async fn read<R>(&self, reader: R) -> std::result::Result<StreamOutput, StreamFailure>
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = FramedRead::new(
            reader,
            LinesCodec::new_with_max_length(self.max_line_length),
        );
        let mut output = StreamOutput::default();

        while let Some(line) = lines.next().await {
            let result = match line {
                Ok(line) => self.handle_line(&line, &mut output),
                Err(e) => Err(ClaudeCodeError::StreamRead(e)),
            };
            if let Err(error) = result {
                return Err(StreamFailure {
                    partial: output,
                    error,
                });
            }
        }

        Ok(output)
    }

    /// Classify one raw line and fold it into `output`.
    ///
    /// # Errors
    ///
    /// Returns the parse, content, CLI-reported or streaming error for the line.
    pub fn handle_line(&self, line: &str, output: &mut StreamOutput) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let (msg_type, payload) = StreamLine::parse(line)?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            let pretty = serde_json::to_string_pretty(&payload).unwrap_or_default();
            let tag = if msg_type.is_empty() { "<empty>" } else { msg_type.as_str() };
            tracing::debug!(msg_type = tag, json = %pretty, "claude stream line");
        }

        match StreamLine::classify(&msg_type, payload)? {
            StreamLine::Assistant(blocks) => {
                for block in blocks {
                    match block {
                        AssistantBlock::Text(text) => {
                            if let Some(streaming) = self.streaming {
                                streaming(&text).map_err(ClaudeCodeError::Streaming)?;
                            }
                            output.text.push_str(&text);
                        }
                        AssistantBlock::ToolUse(tool) => {
                            let event = ToolEvent::tool_use(tool.name, tool.id, tool.input);
                            self.dispatch(&event, output);
                        }
                    }
                }
            }
            StreamLine::ToolResult(result) => {
                let event = ToolEvent::tool_result(result.tool_use_id, result.content);
                self.dispatch(&event, output);
            }
            StreamLine::Result(result) => result.merge_into(&mut output.generation_info),
            StreamLine::CliError(payload) => return Err(ClaudeCodeError::CliReported(payload)),
            StreamLine::Other(_) => {}
        }

        Ok(())
    }

    fn dispatch(&self, event: &ToolEvent, output: &mut StreamOutput) {
        if let Some(hook) = self.hook {
            hook(event);
        }

        let Some(summary) = render_tool_event(self.output_mode, event) else {
            return;
        };
        output.text.push_str(&summary);
        if let Some(streaming) = self.streaming {
            if let Err(e) = streaming(&summary) {
                tracing::debug!(error = %e, "streaming callback rejected tool summary");
            }
        }
    }
}
