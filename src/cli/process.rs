//! Claude Code process spawning and control.
//!
//! [`CommandBuilder`] turns the options and the built prompt into the CLI
//! argument vector. [`ClaudeProcess`] owns one running child together with
//! the task draining its stderr; every way out of the process (normal exit,
//! kill after a stream error) joins that task before returning.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::ClaudeCodeOptions;
use crate::llm::{ClaudeCodeError, Result};

/// Builder for the Claude Code argument vector of a single call.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    options: &'a ClaudeCodeOptions,
    system_prompt: &'a str,
    prompt: &'a str,
}

impl<'a> CommandBuilder<'a> {
    /// Create a builder for `prompt`, using the merged `system_prompt`.
    #[must_use]
    pub fn new(options: &'a ClaudeCodeOptions, system_prompt: &'a str, prompt: &'a str) -> Self {
        Self {
            options,
            system_prompt,
            prompt,
        }
    }

    /// Environment overrides applied on top of the inherited environment.
    #[must_use]
    pub fn env(&self) -> &'a BTreeMap<String, String> {
        self.options.get_env()
    }

    /// Working directory for the child, if configured.
    #[must_use]
    pub fn working_dir(&self) -> Option<&'a Path> {
        self.options.get_cwd()
    }

    /// Build the command-line arguments.
    ///
    /// The prompt always comes last, after `--print --`.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        let opts = self.options;
        let mut args = vec![
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--verbose".to_string(),
        ];

        if !self.system_prompt.is_empty() {
            args.push("--system-prompt".to_string());
            args.push(self.system_prompt.to_string());
        }

        for (flag, tools) in [
            ("--tools", opts.get_tools()),
            ("--allowedTools", opts.get_allowed_tools()),
            ("--disallowedTools", opts.get_disallowed_tools()),
        ] {
            if !tools.is_empty() {
                args.push(flag.to_string());
                args.push(tools.join(","));
            }
        }

        if !opts.get_model().is_empty() {
            args.push("--model".to_string());
            args.push(opts.get_model().to_string());
        }

        if !opts.get_permission_mode().is_empty() {
            args.push("--permission-mode".to_string());
            args.push(opts.get_permission_mode().to_string());
        }

        let session_id = opts.get_session_id();
        if opts.is_resume() {
            if session_id.is_empty() {
                args.push("--continue".to_string());
            } else {
                args.push("--resume".to_string());
                args.push(session_id.to_string());
            }
            if opts.is_fork_session() {
                args.push("--fork-session".to_string());
            }
        } else if !session_id.is_empty() {
            args.push("--session-id".to_string());
            args.push(session_id.to_string());
        }

        if opts.is_no_session_persistence() {
            args.push("--no-session-persistence".to_string());
        }

        // BTreeMap iteration keeps the flags sorted by key.
        for (key, value) in opts.get_extra_args() {
            args.push(format!("--{key}"));
            if !value.is_empty() {
                args.push(value.clone());
            }
        }

        args.push("--print".to_string());
        args.push("--".to_string());
        args.push(self.prompt.to_string());

        args
    }
}

/// Render a command line that can be pasted into a shell.
#[must_use]
pub fn command_line(program: &Path, args: &[String]) -> String {
    let mut parts = vec![shell_escape::escape(program.to_string_lossy())];
    parts.extend(args.iter().map(|arg| shell_escape::escape(Cow::Borrowed(arg.as_str()))));
    parts.join(" ")
}

/// Background task collecting everything the child writes to stderr.
#[derive(Debug)]
pub struct StderrDrain {
    handle: JoinHandle<Vec<u8>>,
}

impl StderrDrain {
    /// Start draining `reader` on a new task.
    pub fn spawn<R>(mut reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = reader.read_to_end(&mut buf).await {
                tracing::debug!(error = %e, "stderr read ended with error");
            }
            tracing::trace!(bytes = buf.len(), "stderr drained");
            buf
        });
        Self { handle }
    }

    /// Wait for the drain to finish and return the trimmed output.
    pub async fn join(self) -> String {
        match self.handle.await {
            Ok(buf) => String::from_utf8_lossy(&buf).trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "stderr drain task failed");
                String::new()
            }
        }
    }
}

/// A running Claude Code process and its stderr drain.
#[derive(Debug)]
pub struct ClaudeProcess {
    child: Child,
    stderr: StderrDrain,
}

impl ClaudeProcess {
    /// Spawn `program` with the arguments, environment and working directory
    /// described by `command`.
    ///
    /// The child is killed if the returned value is dropped before it exits.
    ///
    /// # Errors
    ///
    /// Returns `Spawn` if the process cannot be started and `MissingPipe` if
    /// its stderr was not captured.
    pub fn spawn(program: &Path, command: &CommandBuilder<'_>) -> Result<Self> {
        let args = command.build_args();
        tracing::info!(command = %command_line(program, &args), "Running claude cli");

        let mut cmd = Command::new(program);
        cmd.args(&args)
            .envs(command.env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = command.working_dir() {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(ClaudeCodeError::Spawn)?;
        let Some(stderr) = child.stderr.take() else {
            return Err(ClaudeCodeError::MissingPipe("stderr"));
        };

        Ok(Self {
            child,
            stderr: StderrDrain::spawn(stderr),
        })
    }

    /// Take ownership of the stdout handle.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Kill the process, reap it, and join the stderr drain.
    ///
    /// Returns whatever stderr had been collected.
    pub async fn kill_and_drain(mut self) -> String {
        if let Err(e) = self.child.kill().await {
            tracing::debug!(error = %e, "kill failed, process likely already exited");
        }
        self.stderr.join().await
    }

    /// Wait for the process to exit and join the stderr drain.
    ///
    /// If `cancel` fires first the process is killed instead.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the token fired, `Wait` if waiting fails, and
    /// `CliFailed` with the captured stderr when the process exits
    /// unsuccessfully.
    pub async fn wait_for_exit(mut self, cancel: &CancellationToken) -> Result<()> {
        let status = tokio::select! {
            biased;

            () = cancel.cancelled() => None,
            status = self.child.wait() => Some(status),
        };
        let Some(status) = status else {
            tracing::info!("Call cancelled while waiting for claude cli");
            self.kill_and_drain().await;
            return Err(ClaudeCodeError::Cancelled);
        };

        let stderr = self.stderr.join().await;
        let status = status.map_err(ClaudeCodeError::Wait)?;

        if status.success() {
            if !stderr.is_empty() {
                tracing::debug!(stderr = %stderr, "claude cli wrote to stderr");
            }
            return Ok(());
        }

        tracing::warn!(%status, stderr = %stderr, "claude cli exited unsuccessfully");
        Err(ClaudeCodeError::CliFailed { status, stderr })
    }
}
