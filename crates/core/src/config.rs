// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Configuration loading and validation.
//!
//! `foreman.config.json` is loaded once at startup; `~` is expanded in path
//! fields and defaults are applied for the optional keys.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Model used when neither the step nor the config names one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::sync::Arc<std::io::Error>,
    },

    #[error("invalid config in {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// One step definition used by `create_workflow_steps` and the
/// `default_workflow` config key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Main git working tree that worktrees fork from.
    pub repo_path: PathBuf,
    /// Branch worktrees are based on.
    pub base_branch: String,
    /// Root directory for per-task checkouts.
    pub worktrees_path: PathBuf,
    /// SQLite store file path.
    pub db_path: PathBuf,
    #[serde(default = "defaults::max_parallel_agents")]
    pub max_parallel_agents: usize,
    /// Reserved for external service allocation.
    #[serde(default = "defaults::port_range")]
    pub port_range: [u16; 2],
    #[serde(default = "defaults::model")]
    pub default_model: String,
    /// Step definitions applied when a project is created without explicit
    /// steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_workflow: Option<Vec<StepDef>>,
    /// Agent CLI launched per dispatch. Overridable so tests and
    /// alternative agent frontends can stand in.
    #[serde(default = "defaults::agent_command")]
    pub agent_command: String,
}

mod defaults {
    pub(super) fn max_parallel_agents() -> usize {
        3
    }

    pub(super) fn port_range() -> [u16; 2] {
        [4000, 4099]
    }

    pub(super) fn model() -> String {
        super::DEFAULT_MODEL.to_string()
    }

    pub(super) fn agent_command() -> String {
        "claude".to_string()
    }
}

impl Config {
    /// Load and validate a config file, expanding `~` in path fields.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: std::sync::Arc::new(e),
        })?;
        let mut config: Config =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Invalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate(path)?;
        config.expand_paths();
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if self.base_branch.trim().is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: "base_branch must be non-empty".to_string(),
            });
        }
        if self.max_parallel_agents == 0 {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: "max_parallel_agents must be at least 1".to_string(),
            });
        }
        if self.port_range[0] > self.port_range[1] {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: format!(
                    "port_range start {} exceeds end {}",
                    self.port_range[0], self.port_range[1]
                ),
            });
        }
        Ok(())
    }

    fn expand_paths(&mut self) {
        self.repo_path = expand_tilde(&self.repo_path);
        self.worktrees_path = expand_tilde(&self.worktrees_path);
        self.db_path = expand_tilde(&self.db_path);
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    if s == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }
    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
