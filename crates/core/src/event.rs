// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Event log types.
//!
//! Events are persisted as opaque JSON for forward compatibility but are
//! modeled in-process as a closed tagged union, one variant per kind.
//! Serializes with `{"type": "task_moved", ...fields}` format. Unknown type
//! tags deserialize to `Unknown` so foreign rows never poison a consumer.

use crate::id::{CommentId, DependencyId, EventId, ProjectId, StepId, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the event log, with its two independent consumption cursors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub payload: EventPayload,
    pub created_at: String,
    pub consumed_by_broadcaster: bool,
    pub consumed_by_trigger: bool,
}

/// Direction of a step move, included in `task_moved` payloads for UX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Forward,
    Backward,
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("forward"),
            Self::Backward => f.write_str("backward"),
        }
    }
}

/// Event kinds the trigger processor subscribes to.
///
/// `orchestrator_trigger` is a legacy kind retained in the filter; rows of
/// that type deserialize to [`EventPayload::Unknown`] and are consumed
/// without action.
pub const TRIGGER_KINDS: &[&str] = &[
    "task_moved",
    "task_created",
    "task_cancelled",
    "task_ready",
    "plan_approved",
    "milestone_completed",
    "orchestrator_trigger",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    ProjectCreated {
        project_id: ProjectId,
    },

    ProjectCancelled {
        project_id: ProjectId,
    },

    TaskCreated {
        task_id: TaskId,
        project_id: ProjectId,
    },

    TaskMoved {
        task_id: TaskId,
        old_step_id: StepId,
        new_step_id: StepId,
        project_id: ProjectId,
        from_step_name: String,
        to_step_name: String,
        from_position: i64,
        to_position: i64,
        direction: MoveDirection,
    },

    TaskCancelled {
        task_id: TaskId,
    },

    TaskUncancelled {
        task_id: TaskId,
    },

    /// Non-step-changing write (output set). Broadcaster-only.
    TaskUpdated {
        task_id: TaskId,
    },

    /// All gates for the task just opened; the trigger processor promotes it
    /// to the next agent step.
    TaskReady {
        task_id: TaskId,
        project_id: ProjectId,
    },

    SubtasksCreated {
        parent_task_id: TaskId,
        task_ids: Vec<TaskId>,
    },

    CommentAdded {
        comment_id: CommentId,
        task_id: TaskId,
    },

    DependencyCreated {
        dependency_id: DependencyId,
        predecessor_id: TaskId,
        successor_id: TaskId,
    },

    DependencyRemoved {
        dependency_id: DependencyId,
        predecessor_id: TaskId,
        successor_id: TaskId,
    },

    PlanApproved {
        task_id: TaskId,
        project_id: ProjectId,
    },

    MilestoneCompleted {
        task_id: TaskId,
        project_id: ProjectId,
    },

    /// Catch-all for event kinds this build does not know.
    #[serde(other)]
    Unknown,
}

impl EventPayload {
    /// The wire tag, duplicated into the event table's `type` column so
    /// consumers can filter without parsing payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProjectCreated { .. } => "project_created",
            Self::ProjectCancelled { .. } => "project_cancelled",
            Self::TaskCreated { .. } => "task_created",
            Self::TaskMoved { .. } => "task_moved",
            Self::TaskCancelled { .. } => "task_cancelled",
            Self::TaskUncancelled { .. } => "task_uncancelled",
            Self::TaskUpdated { .. } => "task_updated",
            Self::TaskReady { .. } => "task_ready",
            Self::SubtasksCreated { .. } => "subtasks_created",
            Self::CommentAdded { .. } => "comment_added",
            Self::DependencyCreated { .. } => "dependency_created",
            Self::DependencyRemoved { .. } => "dependency_removed",
            Self::PlanApproved { .. } => "plan_approved",
            Self::MilestoneCompleted { .. } => "milestone_completed",
            Self::Unknown => "unknown",
        }
    }

    /// The task this event is about, when it is about one.
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            Self::TaskCreated { task_id, .. }
            | Self::TaskMoved { task_id, .. }
            | Self::TaskCancelled { task_id }
            | Self::TaskUncancelled { task_id }
            | Self::TaskUpdated { task_id }
            | Self::TaskReady { task_id, .. }
            | Self::CommentAdded { task_id, .. }
            | Self::PlanApproved { task_id, .. }
            | Self::MilestoneCompleted { task_id, .. } => Some(task_id),
            Self::SubtasksCreated { parent_task_id, .. } => Some(parent_task_id),
            Self::ProjectCreated { .. }
            | Self::ProjectCancelled { .. }
            | Self::DependencyCreated { .. }
            | Self::DependencyRemoved { .. }
            | Self::Unknown => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
