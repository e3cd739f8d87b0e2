// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fm-engine: the orchestration engine.
//!
//! The tool surface (the single writer of the board), the dependency engine,
//! the trigger processor, the worktree coordinator, the agent runner, the
//! event broadcaster, and the transcript reader.

#[cfg(test)]
pub(crate) mod test_support;

pub mod broadcaster;
pub mod context;
pub mod deps;
pub mod error;
pub mod git;
pub mod runner;
pub mod subprocess;
pub mod tools;
pub mod transcript;
pub mod trigger;
pub mod worktree;

pub use broadcaster::{Broadcaster, ListenerRegistrar};
pub use context::EngineContext;
pub use error::{EngineError, LaunchError, OpError, WorktreeError};
pub use runner::{
    launch_agent, prepare_dispatch, run_dispatch, AgentRegistry, PreparedDispatch, RunOutcome,
};
pub use tools::ToolSurface;
pub use transcript::{read_for_task, read_transcript, TranscriptPage, TranscriptStatus};
pub use trigger::{TriggerProcessor, TRIGGER_POLL_INTERVAL};
pub use worktree::{WorktreeCoordinator, WorktreeInfo};
