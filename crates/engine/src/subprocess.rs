// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Bounded subprocess execution for git commands.

use crate::error::WorktreeError;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// All git operations are bounded; a hung git never stalls a scheduler.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a command to completion with a timeout. The returned output carries
/// status, stdout, and stderr; callers decide what a non-zero status means.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    action: &'static str,
) -> Result<Output, WorktreeError> {
    cmd.kill_on_drop(true);
    let fut = cmd.output();
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(WorktreeError::Io {
            action,
            message: e.to_string(),
        }),
        Err(_) => Err(WorktreeError::Timeout {
            action,
            seconds: timeout.as_secs(),
        }),
    }
}

/// A git command scoped to `cwd`, with inherited `GIT_DIR`/`GIT_WORK_TREE`
/// scrubbed so worktree operations resolve against the right checkout.
pub fn git_command(cwd: &std::path::Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(cwd)
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE");
    cmd
}
