// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Read operations: enriched board, task detail, step listings.

use super::{require_project, require_step, require_task, ToolSurface};
use crate::error::OpError;
use fm_core::{
    valid_target_steps, AgentRun, Clock, Comment, Project, ProjectId, StepId, Task, TaskId,
    ToolError, WorkflowStep,
};
use fm_store::{comments, runs, steps, tasks};
use serde::Serialize;

/// A task row enriched for board rendering.
#[derive(Debug, Clone, Serialize)]
pub struct BoardTask {
    #[serde(flatten)]
    pub task: Task,
    pub comment_count: i64,
}

/// One step column with its resident tasks.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    pub step: WorkflowStep,
    pub tasks: Vec<BoardTask>,
}

/// Full board state for a project, grouped by step.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub project: Project,
    pub columns: Vec<BoardColumn>,
}

/// A single task with its thread, run history, and dependency ids.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub comments: Vec<Comment>,
    pub runs: Vec<AgentRun>,
    pub predecessor_ids: Vec<TaskId>,
    pub successor_ids: Vec<TaskId>,
}

impl<C: Clock> ToolSurface<C> {
    /// Full board state: every step column with its tasks and comment
    /// counts. Cancelled tasks are included; clients gray them out.
    pub fn get_board(&self, project_id: &ProjectId) -> Result<BoardView, OpError> {
        let conn = self.db().conn();
        let project = require_project(conn, project_id)?;
        let step_rows = steps::list_for_project(conn, project_id)?;
        let all_tasks = tasks::list_for_project(conn, project_id)?;

        let mut columns = Vec::with_capacity(step_rows.len());
        for step in step_rows {
            let mut column_tasks = Vec::new();
            for task in all_tasks.iter().filter(|t| t.step_id == step.id) {
                column_tasks.push(BoardTask {
                    task: task.clone(),
                    comment_count: comments::count_for_task(conn, &task.id)?,
                });
            }
            columns.push(BoardColumn {
                step,
                tasks: column_tasks,
            });
        }
        Ok(BoardView { project, columns })
    }

    pub fn get_task(&self, task_id: &TaskId) -> Result<TaskDetail, OpError> {
        let conn = self.db().conn();
        let task = require_task(conn, task_id)?;
        let edges = fm_store::deps::edges_for_task(conn, task_id)?;
        let (mut predecessor_ids, mut successor_ids) = (Vec::new(), Vec::new());
        for edge in edges {
            if edge.successor_id == *task_id {
                predecessor_ids.push(edge.predecessor_id);
            } else {
                successor_ids.push(edge.successor_id);
            }
        }
        Ok(TaskDetail {
            comments: comments::list_for_task(conn, task_id)?,
            runs: runs::list_for_task(conn, task_id)?,
            predecessor_ids,
            successor_ids,
            task,
        })
    }

    /// Non-cancelled tasks sitting at a step, for an agent asking "what is
    /// mine". The optional project filter must agree with the step.
    pub fn get_my_tasks(
        &self,
        step_id: &StepId,
        project_id: Option<&ProjectId>,
    ) -> Result<Vec<BoardTask>, OpError> {
        let conn = self.db().conn();
        let step = require_step(conn, step_id)?;
        if let Some(project_id) = project_id {
            if step.project_id != *project_id {
                return Err(ToolError::invalid_input(format!(
                    "step '{step_id}' belongs to a different project"
                ))
                .into());
            }
        }
        let mut out = Vec::new();
        for task in tasks::list_at_step(conn, step_id)? {
            out.push(BoardTask {
                comment_count: comments::count_for_task(conn, &task.id)?,
                task,
            });
        }
        Ok(out)
    }

    pub fn get_workflow_steps(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<WorkflowStep>, OpError> {
        let conn = self.db().conn();
        require_project(conn, project_id)?;
        Ok(steps::list_for_project(conn, project_id)?)
    }

    /// The steps a task may legally move to right now.
    pub fn get_valid_steps(&self, task_id: &TaskId) -> Result<Vec<WorkflowStep>, OpError> {
        let conn = self.db().conn();
        let task = require_task(conn, task_id)?;
        let current = require_step(conn, &task.step_id)?;
        let all = steps::list_for_project(conn, &task.project_id)?;
        Ok(valid_target_steps(&task, &current, &all)
            .into_iter()
            .cloned()
            .collect())
    }
}
