// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Task entity and task types.

use crate::id::{ProjectId, StepId, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub step_id: StepId,
    pub cancelled: bool,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Only meaningful for milestones; transitions false → true exactly once.
    pub plan_approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Set iff a worktree currently exists on disk for this task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worktree_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Agent session identifier captured from the subprocess init handshake.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    pub fn is_milestone(&self) -> bool {
        self.task_type == TaskType::Milestone
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Task,
    Research,
    Milestone,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Research => "research",
            Self::Milestone => "milestone",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "task" => Some(Self::Task),
            "research" => Some(Self::Research),
            "milestone" => Some(Self::Milestone),
            _ => None,
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for TaskType {
    fn default() -> Self {
        Self::Task
    }
}

/// One child in a `create_subtasks` batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskSpec {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Step override for this child; the batch default applies otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<StepId>,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
}

/// An intra-batch dependency edge by list index: the task at `from_index`
/// must finish before the task at `to_index` may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDependency {
    pub from_index: usize,
    pub to_index: usize,
}
