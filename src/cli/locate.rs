//! Locating the Claude Code binary.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::llm::{ClaudeCodeError, Result};

/// Name of the Claude Code executable.
pub const CLI_BINARY: &str = "claude";

/// Find the Claude Code binary, preferring `~/.local/bin` over `PATH`.
///
/// # Errors
///
/// Returns `CliNotFound` if neither location holds an executable `claude`.
pub fn find_cli() -> Result<PathBuf> {
    find_cli_in(dirs::home_dir().as_deref(), std::env::var_os("PATH"))
}

/// Find the binary under `home/.local/bin`, then in the `path` search list.
///
/// # Errors
///
/// Returns `CliNotFound` with the error of the `PATH` lookup.
pub fn find_cli_in(home: Option<&Path>, path: Option<OsString>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_default();

    if let Some(home) = home {
        let local_bin = home.join(".local").join("bin");
        if let Ok(found) = which::which_in(CLI_BINARY, Some(&local_bin), &cwd) {
            tracing::debug!(path = %found.display(), "Found claude in ~/.local/bin");
            return Ok(found);
        }
    }

    let found = which::which_in(CLI_BINARY, path, &cwd).map_err(ClaudeCodeError::CliNotFound)?;
    tracing::debug!(path = %found.display(), "Found claude on PATH");
    Ok(found)
}
