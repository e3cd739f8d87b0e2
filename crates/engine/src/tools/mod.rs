// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! The tool surface: every mutation of the board goes through here.
//!
//! The same operations back the HTTP adapter and the stdio tool protocol
//! that in-flight agents call. Each mutating operation composes its data
//! writes and its event insert in a single committed transaction and returns
//! either a success payload or a tagged [`ToolError`].

mod comments;
mod dependencies;
mod milestones;
mod projects;
mod reads;
mod subtasks;
mod tasks;

pub use dependencies::DependencyView;
pub use fm_core::{BatchDependency, SubtaskSpec};
pub use projects::CreateProject;
pub use reads::{BoardColumn, BoardTask, BoardView, TaskDetail};
pub use tasks::CreateTask;

use crate::error::OpError;
use fm_core::{
    Clock, EventId, EventPayload, Project, ProjectId, StepId, SystemClock, Task, TaskId,
    ToolError, WorkflowStep,
};
use fm_store::{events, projects as project_queries, steps, tasks as task_queries, Db};
use rusqlite::Connection;

pub struct ToolSurface<C: Clock = SystemClock> {
    db: Db,
    clock: C,
    default_workflow: Option<Vec<fm_core::StepDef>>,
}

impl ToolSurface<SystemClock> {
    pub fn new(db: Db) -> Self {
        Self {
            db,
            clock: SystemClock,
            default_workflow: None,
        }
    }
}

impl<C: Clock> ToolSurface<C> {
    pub fn with_clock(db: Db, clock: C) -> Self {
        Self {
            db,
            clock,
            default_workflow: None,
        }
    }

    /// Seed this workflow into projects created without explicit steps.
    pub fn with_default_workflow(mut self, steps: Vec<fm_core::StepDef>) -> Self {
        if !steps.is_empty() {
            self.default_workflow = Some(steps);
        }
        self
    }

    pub(crate) fn default_workflow(&self) -> Option<&[fm_core::StepDef]> {
        self.default_workflow.as_deref()
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn db_mut(&mut self) -> &mut Db {
        &mut self.db
    }

    pub(crate) fn now(&self) -> String {
        self.clock.timestamp()
    }
}

/// Insert an event row inside the caller's transaction.
pub(crate) fn emit(
    conn: &Connection,
    payload: &EventPayload,
    now: &str,
) -> Result<(), OpError> {
    events::insert(conn, &EventId::new(), payload, now)?;
    Ok(())
}

pub(crate) fn require_project(
    conn: &Connection,
    id: &ProjectId,
) -> Result<Project, OpError> {
    project_queries::get(conn, id)?
        .ok_or_else(|| ToolError::not_found(format!("project '{id}' not found")).into())
}

pub(crate) fn require_task(conn: &Connection, id: &TaskId) -> Result<Task, OpError> {
    task_queries::get(conn, id)?
        .ok_or_else(|| ToolError::not_found(format!("task '{id}' not found")).into())
}

pub(crate) fn require_step(conn: &Connection, id: &StepId) -> Result<WorkflowStep, OpError> {
    steps::get(conn, id)?
        .ok_or_else(|| ToolError::not_found(format!("step '{id}' not found")).into())
}

/// Emit the enriched `task_moved` payload for a forward move performed
/// outside `move_task` (ready-promotion in the trigger loop).
pub(crate) fn emit_task_moved_forward(
    conn: &Connection,
    task: &Task,
    from: &WorkflowStep,
    to: &WorkflowStep,
    now: &str,
) -> Result<(), OpError> {
    tasks::emit_moved(
        conn,
        &fm_core::StepTransition {
            task_id: task.id.clone(),
            project_id: task.project_id.clone(),
            from_step_id: from.id.clone(),
            from_step_name: from.name.clone(),
            from_position: from.position,
            to_step_id: to.id.clone(),
            to_step_name: to.name.clone(),
            to_position: to.position,
            direction: fm_core::MoveDirection::Forward,
        },
        now,
    )
}

#[cfg(test)]
#[path = "../tools_tests.rs"]
mod tests;
