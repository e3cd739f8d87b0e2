// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Engine error types.

use fm_core::{TaskId, ToolError};
use fm_store::StoreError;
use thiserror::Error;

/// Failure of a tool-surface call: either a domain rejection the caller can
/// act on, or an infrastructure failure (mapped to a generic error at the
/// transport boundary).
#[derive(Debug, Error)]
pub enum OpError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OpError {
    /// The tagged tool error, when this is a domain rejection.
    pub fn as_tool(&self) -> Option<&ToolError> {
        match self {
            Self::Tool(err) => Some(err),
            Self::Store(_) => None,
        }
    }
}

impl From<fm_core::TransitionError> for OpError {
    fn from(err: fm_core::TransitionError) -> Self {
        Self::Tool(err.into())
    }
}

impl From<rusqlite::Error> for OpError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(StoreError::from(err))
    }
}

/// Git worktree operation failure.
#[derive(Debug, Error)]
pub enum WorktreeError {
    #[error("git {action} failed: {stderr}")]
    Command { action: &'static str, stderr: String },

    #[error("git {action} timed out after {seconds}s")]
    Timeout { action: &'static str, seconds: u64 },

    #[error("git {action} could not run: {message}")]
    Io { action: &'static str, message: String },
}

/// Agent dispatch failure.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("task {0} is cancelled")]
    TaskCancelled(TaskId),

    #[error("task {0} already has an active agent run")]
    RunInProgress(TaskId),

    #[error("step '{step_name}' has no system_prompt (no agent configured)")]
    NoAgent { step_name: String },

    #[error("step not found for task {0}")]
    StepNotFound(TaskId),

    #[error("agent command '{command}' could not be started: {message}")]
    Spawn { command: String, message: String },

    #[error("failed to write agent backchannel config: {0}")]
    BackchannelConfig(String),

    #[error(transparent)]
    Worktree(#[from] WorktreeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Scheduler-internal failure; logged by the loop, never propagated out.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Op(#[from] OpError),
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(StoreError::from(err))
    }
}
