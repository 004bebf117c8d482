//! Client options.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tools::{ToolEvent, ToolEventHook};

/// Permission mode used when none is configured.
pub const DEFAULT_PERMISSION_MODE: &str = "bypassPermissions";

/// Default cap on a single stdout line (1 MiB).
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 1024 * 1024;

/// How much tool activity is folded into the response text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Only the assistant's text.
    #[default]
    Text,
    /// Text plus a one-line summary per tool request.
    Verbose,
    /// Text plus full tool inputs and truncated tool outputs.
    Full,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Verbose => f.write_str("verbose"),
            Self::Full => f.write_str("full"),
        }
    }
}

/// Configuration for a [`ClaudeCodeLlm`](crate::llm::ClaudeCodeLlm).
///
/// Start from [`ClaudeCodeOptions::default`] and apply setters in order;
/// later setters overwrite earlier ones.
#[derive(Clone)]
pub struct ClaudeCodeOptions {
    cli_path: Option<PathBuf>,
    model: String,
    system_prompt: String,
    cwd: Option<PathBuf>,
    permission_mode: String,
    tools: Vec<String>,
    allowed_tools: Vec<String>,
    disallowed_tools: Vec<String>,
    env: BTreeMap<String, String>,
    extra_args: BTreeMap<String, String>,
    max_buffer_size: usize,
    output_mode: OutputMode,
    tool_event_hook: Option<ToolEventHook>,
    session_id: String,
    resume: bool,
    fork_session: bool,
    no_session_persistence: bool,
}

impl Default for ClaudeCodeOptions {
    fn default() -> Self {
        Self {
            cli_path: None,
            model: String::new(),
            system_prompt: String::new(),
            cwd: None,
            permission_mode: DEFAULT_PERMISSION_MODE.to_string(),
            tools: Vec::new(),
            allowed_tools: Vec::new(),
            disallowed_tools: Vec::new(),
            env: BTreeMap::new(),
            extra_args: BTreeMap::new(),
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            output_mode: OutputMode::Text,
            tool_event_hook: None,
            session_id: String::new(),
            resume: false,
            fork_session: false,
            no_session_persistence: false,
        }
    }
}

impl fmt::Debug for ClaudeCodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaudeCodeOptions")
            .field("cli_path", &self.cli_path)
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("cwd", &self.cwd)
            .field("permission_mode", &self.permission_mode)
            .field("tools", &self.tools)
            .field("allowed_tools", &self.allowed_tools)
            .field("disallowed_tools", &self.disallowed_tools)
            .field("env", &self.env.keys().collect::<Vec<_>>())
            .field("extra_args", &self.extra_args)
            .field("max_buffer_size", &self.max_buffer_size)
            .field("output_mode", &self.output_mode)
            .field("tool_event_hook", &self.tool_event_hook.is_some())
            .field("session_id", &self.session_id)
            .field("resume", &self.resume)
            .field("fork_session", &self.fork_session)
            .field("no_session_persistence", &self.no_session_persistence)
            .finish()
    }
}

fn owned_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl ClaudeCodeOptions {
    /// Use an explicit CLI binary instead of searching for one. A blank path
    /// restores the search.
    #[must_use]
    pub fn cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.cli_path = if path.to_string_lossy().trim().is_empty() {
            None
        } else {
            Some(path)
        };
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Base system prompt, placed before system text taken from messages.
    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Working directory for the CLI process.
    #[must_use]
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.cwd = if dir.as_os_str().is_empty() {
            None
        } else {
            Some(dir)
        };
        self
    }

    /// CLI permission mode. An empty mode falls back to `bypassPermissions`.
    #[must_use]
    pub fn permission_mode(mut self, mode: impl Into<String>) -> Self {
        let mode = mode.into();
        self.permission_mode = if mode.is_empty() {
            DEFAULT_PERMISSION_MODE.to_string()
        } else {
            mode
        };
        self
    }

    /// Replace the CLI's base tool set.
    #[must_use]
    pub fn tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = owned_list(tools);
        self
    }

    #[must_use]
    pub fn allowed_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tools = owned_list(tools);
        self
    }

    #[must_use]
    pub fn disallowed_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disallowed_tools = owned_list(tools);
        self
    }

    /// Environment overrides layered on top of the inherited environment.
    #[must_use]
    pub fn env<I, K, V>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = env.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Additional `--<flag> [value]` arguments. An empty value emits a bare flag.
    #[must_use]
    pub fn extra_args<I, K, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.extra_args = args
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Maximum size of one stdout line. Zero is ignored.
    #[must_use]
    pub fn max_buffer_size(mut self, size: usize) -> Self {
        if size > 0 {
            self.max_buffer_size = size;
        }
        self
    }

    #[must_use]
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Hook called for every tool request and tool result.
    #[must_use]
    pub fn tool_event_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ToolEvent) + Send + Sync + 'static,
    {
        self.tool_event_hook = Some(Arc::new(hook));
        self
    }

    /// Session to create or resume (UUID).
    #[must_use]
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Resume the configured session, or the most recent one when no id is set.
    #[must_use]
    pub fn resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Give a resumed session a new id.
    #[must_use]
    pub fn fork_session(mut self, fork: bool) -> Self {
        self.fork_session = fork;
        self
    }

    #[must_use]
    pub fn no_session_persistence(mut self, disabled: bool) -> Self {
        self.no_session_persistence = disabled;
        self
    }

    #[must_use]
    pub fn get_cli_path(&self) -> Option<&Path> {
        self.cli_path.as_deref()
    }

    #[must_use]
    pub fn get_model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn get_system_prompt(&self) -> &str {
        &self.system_prompt
    }

    #[must_use]
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    #[must_use]
    pub fn get_permission_mode(&self) -> &str {
        &self.permission_mode
    }

    #[must_use]
    pub fn get_tools(&self) -> &[String] {
        &self.tools
    }

    #[must_use]
    pub fn get_allowed_tools(&self) -> &[String] {
        &self.allowed_tools
    }

    #[must_use]
    pub fn get_disallowed_tools(&self) -> &[String] {
        &self.disallowed_tools
    }

    #[must_use]
    pub fn get_env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    #[must_use]
    pub fn get_extra_args(&self) -> &BTreeMap<String, String> {
        &self.extra_args
    }

    #[must_use]
    pub fn get_max_buffer_size(&self) -> usize {
        self.max_buffer_size
    }

    #[must_use]
    pub fn get_output_mode(&self) -> OutputMode {
        self.output_mode
    }

    #[must_use]
    pub fn get_tool_event_hook(&self) -> Option<&ToolEventHook> {
        self.tool_event_hook.as_ref()
    }

    #[must_use]
    pub fn get_session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn is_resume(&self) -> bool {
        self.resume
    }

    #[must_use]
    pub fn is_fork_session(&self) -> bool {
        self.fork_session
    }

    #[must_use]
    pub fn is_no_session_persistence(&self) -> bool {
        self.no_session_persistence
    }
}
