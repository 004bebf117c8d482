//! Per-call options.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::BoxError;

/// Callback receiving each chunk of response text as it is read.
///
/// Returning an error aborts the call, except for tool summaries where the
/// error is only logged.
pub type StreamingFunc = Arc<dyn Fn(&str) -> Result<(), BoxError> + Send + Sync>;

/// Options for a single [`generate_content`](super::ClaudeCodeLlm::generate_content) call.
#[derive(Clone, Default)]
pub struct CallOptions {
    pub streaming_func: Option<StreamingFunc>,
    /// Cancelling the token kills the CLI process.
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive text chunks as they arrive.
    #[must_use]
    pub fn with_streaming_func<F>(mut self, func: F) -> Self
    where
        F: Fn(&str) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.streaming_func = Some(Arc::new(func));
        self
    }

    /// Set a cancellation token for the call.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Check if the call has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("streaming_func", &self.streaming_func.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}
