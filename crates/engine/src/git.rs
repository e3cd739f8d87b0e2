// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Repository validation helpers used by `create_project`.

use crate::subprocess::{git_command, run_with_timeout, GIT_TIMEOUT};
use std::path::Path;

/// True when `path` is a directory inside a git working tree.
pub async fn is_git_repo(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    let mut cmd = git_command(path);
    cmd.args(["rev-parse", "--is-inside-work-tree"]);
    match run_with_timeout(cmd, GIT_TIMEOUT, "rev-parse").await {
        Ok(output) => {
            output.status.success()
                && String::from_utf8_lossy(&output.stdout).trim() == "true"
        }
        Err(_) => false,
    }
}

/// Detect the default branch for a repository.
///
/// Tries `origin/HEAD`, then local `main`/`master`, then falls back to
/// `"main"`.
pub async fn detect_default_branch(path: &Path) -> String {
    let mut cmd = git_command(path);
    cmd.args(["symbolic-ref", "refs/remotes/origin/HEAD"]);
    if let Ok(output) = run_with_timeout(cmd, GIT_TIMEOUT, "symbolic-ref").await {
        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            // Output is like "refs/remotes/origin/main".
            if let Some(branch) = stdout.trim().rsplit('/').next() {
                if !branch.is_empty() {
                    return branch.to_string();
                }
            }
        }
    }

    let mut cmd = git_command(path);
    cmd.args(["branch", "--list"]);
    if let Ok(output) = run_with_timeout(cmd, GIT_TIMEOUT, "branch list").await {
        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let branches: Vec<&str> = stdout
                .lines()
                .map(|line| line.trim().trim_start_matches("* ").trim())
                .collect();
            if branches.contains(&"main") {
                return "main".to_string();
            }
            if branches.contains(&"master") {
                return "master".to_string();
            }
        }
    }

    "main".to_string()
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
