// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Transcript reader: paginated tail of the per-session structured log the
//! agent subprocess writes.
//!
//! The agent CLI derives its per-session directory name from the working
//! directory it was launched in (the worktree), so the path is
//! reconstructed here rather than stored: trim the leading separator,
//! replace every separator and dot with a dash, and look under
//! `{base}/projects/{encoded}/{session_id}.jsonl`.

use fm_core::{Task, TaskId};
use fm_store::{runs, tasks, Db, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Structured message types worth showing; everything else (progress pings,
/// file-history snapshots) is filtered out.
const MEANINGFUL_TYPES: &[&str] = &["system", "user", "assistant", "result"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    /// The task has an active agent run; more lines are coming.
    Running,
    /// No active run; the transcript is complete.
    Completed,
    NoSession,
    NoWorktree,
    TranscriptNotFound,
    ReadError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptPage {
    pub lines: Vec<serde_json::Value>,
    /// Pass back as `offset` on the next call to tail new lines only.
    pub new_offset: usize,
    pub status: TranscriptStatus,
}

impl TranscriptPage {
    fn empty(offset: usize, status: TranscriptStatus) -> Self {
        Self {
            lines: Vec::new(),
            new_offset: offset,
            status,
        }
    }
}

/// The agent CLI's directory name for a working directory: leading
/// separator trimmed, every separator and `.` replaced by a dash.
pub fn project_dir_name(worktree_path: &Path) -> String {
    let raw = worktree_path.display().to_string();
    let trimmed = raw.strip_prefix(MAIN_SEPARATOR).unwrap_or(&raw);
    trimmed.replace([MAIN_SEPARATOR, '.'], "-")
}

pub fn transcript_path(base: &Path, worktree_path: &Path, session_id: &str) -> PathBuf {
    base.join("projects")
        .join(project_dir_name(worktree_path))
        .join(format!("{session_id}.jsonl"))
}

/// The default transcript base: `~/.claude`.
pub fn default_base() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/"))
        .join(".claude")
}

/// Store-aware entry point: resolve the task and its active-run flag, then
/// read. `None` when the task does not exist.
pub fn read_for_task(
    db: &Db,
    base: &Path,
    task_id: &TaskId,
    offset: usize,
) -> Result<Option<TranscriptPage>, StoreError> {
    let Some(task) = tasks::get(db.conn(), task_id)? else {
        return Ok(None);
    };
    let has_active_run = runs::has_active(db.conn(), task_id)?;
    Ok(Some(read_transcript(base, &task, has_active_run, offset)))
}

/// Read a task's transcript from `offset` (a line index into the raw file).
///
/// `has_active_run` distinguishes `running` from `completed` on success.
pub fn read_transcript(
    base: &Path,
    task: &Task,
    has_active_run: bool,
    offset: usize,
) -> TranscriptPage {
    let Some(session_id) = &task.session_id else {
        return TranscriptPage::empty(offset, TranscriptStatus::NoSession);
    };
    let Some(worktree_path) = &task.worktree_path else {
        return TranscriptPage::empty(offset, TranscriptStatus::NoWorktree);
    };

    let path = transcript_path(base, worktree_path, session_id);
    if !path.is_file() {
        return TranscriptPage::empty(offset, TranscriptStatus::TranscriptNotFound);
    }

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "transcript read failed");
            return TranscriptPage::empty(offset, TranscriptStatus::ReadError);
        }
    };

    let mut lines = Vec::new();
    let mut scanned = 0;
    for (index, line) in raw.lines().enumerate() {
        scanned = index + 1;
        if index < offset {
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(message) = serde_json::from_str::<serde_json::Value>(line) else {
            continue;
        };
        let keep = message["type"]
            .as_str()
            .is_some_and(|t| MEANINGFUL_TYPES.contains(&t));
        if keep {
            lines.push(message);
        }
    }

    TranscriptPage {
        lines,
        new_offset: scanned.max(offset),
        status: if has_active_run {
            TranscriptStatus::Running
        } else {
            TranscriptStatus::Completed
        },
    }
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod tests;
