//! Configuration file loader.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{ClaudeCodeOptions, OutputMode};

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".claude-code-llm.toml";

/// Options loaded from a TOML file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub cli_path: Option<PathBuf>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub cwd: Option<PathBuf>,
    pub permission_mode: Option<String>,
    pub tools: Option<Vec<String>>,
    pub allowed_tools: Option<Vec<String>>,
    pub disallowed_tools: Option<Vec<String>>,
    pub env: Option<BTreeMap<String, String>>,
    pub extra_args: Option<BTreeMap<String, String>>,
    pub max_buffer_size: Option<usize>,
    pub output_mode: Option<OutputMode>,
    pub session_id: Option<String>,
    pub resume: Option<bool>,
    pub fork_session: Option<bool>,
    pub no_session_persistence: Option<bool>,
}

impl FileConfig {
    /// Apply the fields present in the file on top of `options`.
    #[must_use]
    pub fn apply(self, mut options: ClaudeCodeOptions) -> ClaudeCodeOptions {
        if let Some(path) = self.cli_path {
            options = options.cli_path(path);
        }
        if let Some(model) = self.model {
            options = options.model(model);
        }
        if let Some(prompt) = self.system_prompt {
            options = options.system_prompt(prompt);
        }
        if let Some(cwd) = self.cwd {
            options = options.cwd(cwd);
        }
        if let Some(mode) = self.permission_mode {
            options = options.permission_mode(mode);
        }
        if let Some(tools) = self.tools {
            options = options.tools(tools);
        }
        if let Some(tools) = self.allowed_tools {
            options = options.allowed_tools(tools);
        }
        if let Some(tools) = self.disallowed_tools {
            options = options.disallowed_tools(tools);
        }
        if let Some(env) = self.env {
            options = options.env(env);
        }
        if let Some(args) = self.extra_args {
            options = options.extra_args(args);
        }
        if let Some(size) = self.max_buffer_size {
            options = options.max_buffer_size(size);
        }
        if let Some(mode) = self.output_mode {
            options = options.output_mode(mode);
        }
        if let Some(session_id) = self.session_id {
            options = options.session_id(session_id);
        }
        if let Some(resume) = self.resume {
            options = options.resume(resume);
        }
        if let Some(fork) = self.fork_session {
            options = options.fork_session(fork);
        }
        if let Some(disabled) = self.no_session_persistence {
            options = options.no_session_persistence(disabled);
        }
        options
    }
}

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .claude-code-llm.toml
        search_paths.push(PathBuf::from(LOCAL_CONFIG_FILE));

        // 2. User config directory: ~/.config/claude-code-llm/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("claude-code-llm").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load(&self) -> Result<FileConfig, ConfigError> {
        for path in &self.search_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Self::load_from_path(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(FileConfig::default())
    }

    fn load_from_path(path: &PathBuf) -> Result<FileConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}
