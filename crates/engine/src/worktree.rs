// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Worktree coordinator: isolated checkouts keyed by `(project_id, task_id)`.
//!
//! Paths are deterministic: `{worktrees_root}/{project_id}/{task_id}/`. All
//! operations are process-blocking git invocations; schedulers run them from
//! spawned tasks, never inline in a tick.

use crate::error::WorktreeError;
use crate::subprocess::{git_command, run_with_timeout, GIT_TIMEOUT};
use fm_core::{ProjectId, TaskId};
use std::path::{Path, PathBuf};

/// A created or reused checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeInfo {
    pub path: PathBuf,
    pub branch: String,
}

#[derive(Debug, Clone)]
pub struct WorktreeCoordinator {
    repo_path: PathBuf,
    base_branch: String,
    worktrees_root: PathBuf,
}

impl WorktreeCoordinator {
    pub fn new(repo_path: PathBuf, base_branch: String, worktrees_root: PathBuf) -> Self {
        Self {
            repo_path,
            base_branch,
            worktrees_root,
        }
    }

    /// The deterministic checkout path for a task.
    pub fn path_for(&self, project_id: &ProjectId, task_id: &TaskId) -> PathBuf {
        self.worktrees_root
            .join(project_id.as_str())
            .join(task_id.as_str())
    }

    /// Create an isolated checkout for a task. Idempotent: an existing valid
    /// checkout is returned with its recorded branch.
    ///
    /// Fresh checkouts branch off `base_branch` as
    /// `task-{first-8-of-task-id}-{epoch_secs}`.
    pub async fn create(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
        epoch_secs: i64,
    ) -> Result<WorktreeInfo, WorktreeError> {
        let path = self.path_for(project_id, task_id);

        if worktree_exists(&path) {
            let branch = read_branch(&path).await.unwrap_or_default();
            return Ok(WorktreeInfo { path, branch });
        }

        let branch = format!("task-{}-{}", task_id.short(8), epoch_secs);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WorktreeError::Io {
                    action: "worktree add",
                    message: format!("failed to create worktree parent dir: {e}"),
                })?;
        }

        let mut cmd = git_command(&self.repo_path);
        cmd.args(["worktree", "add", "-b", &branch])
            .arg(&path)
            .arg(&self.base_branch);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "worktree add").await?;
        if !output.status.success() {
            return Err(WorktreeError::Command {
                action: "worktree add",
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(WorktreeInfo { path, branch })
    }

    /// Detach a checkout and delete its branch. Branch deletion is
    /// best-effort: already-gone is fine.
    pub async fn remove(&self, worktree_path: &Path) -> Result<(), WorktreeError> {
        let branch = read_branch(worktree_path).await;

        let mut cmd = git_command(&self.repo_path);
        cmd.args(["worktree", "remove", "--force"]).arg(worktree_path);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "worktree remove").await?;
        if !output.status.success() {
            return Err(WorktreeError::Command {
                action: "worktree remove",
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if let Some(branch) = branch.filter(|b| !b.is_empty()) {
            let mut cmd = git_command(&self.repo_path);
            cmd.args(["branch", "-D", &branch]);
            if let Ok(output) = run_with_timeout(cmd, GIT_TIMEOUT, "branch delete").await {
                if !output.status.success() {
                    tracing::debug!(
                        branch,
                        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                        "branch delete skipped"
                    );
                }
            }
        }

        Ok(())
    }

    /// Drop stale worktree registrations from the main repository.
    pub async fn prune(&self) -> Result<(), WorktreeError> {
        let mut cmd = git_command(&self.repo_path);
        cmd.args(["worktree", "prune"]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "worktree prune").await?;
        if !output.status.success() {
            return Err(WorktreeError::Command {
                action: "worktree prune",
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Structural existence check: a directory holding a `.git` marker *file*
/// (linked checkouts have a file, the main repo has a directory).
pub fn worktree_exists(path: &Path) -> bool {
    let git_marker = path.join(".git");
    path.is_dir() && git_marker.is_file()
}

async fn read_branch(worktree_path: &Path) -> Option<String> {
    let mut cmd = git_command(worktree_path);
    cmd.args(["rev-parse", "--abbrev-ref", "HEAD"]);
    let output = run_with_timeout(cmd, GIT_TIMEOUT, "rev-parse").await.ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
#[path = "worktree_tests.rs"]
pub(crate) mod tests;
