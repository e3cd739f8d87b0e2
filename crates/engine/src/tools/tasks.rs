// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Task lifecycle operations: create, move, cancel, complete, output.

use super::{emit, require_project, require_step, require_task, ToolSurface};
use crate::deps;
use crate::error::OpError;
use fm_core::{
    validate_cancel, validate_step_transition, validate_uncancel, Clock, EventPayload,
    MoveDirection, ProjectId, StepId, StepTransition, Task, TaskId, TaskType, ToolError,
};
use fm_store::{steps, tasks};
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub step_id: StepId,
    pub project_id: ProjectId,
    pub parent_task_id: Option<TaskId>,
    pub task_type: TaskType,
}

impl<C: Clock> ToolSurface<C> {
    pub fn create_task(&mut self, input: CreateTask) -> Result<Task, OpError> {
        let now = self.now();
        let tx = self.db_mut().transaction()?;
        require_project(&tx, &input.project_id)?;
        let step = require_step(&tx, &input.step_id)?;
        if step.project_id != input.project_id {
            return Err(ToolError::invalid_input(format!(
                "step '{}' belongs to a different project",
                input.step_id
            ))
            .into());
        }
        if let Some(parent_id) = &input.parent_task_id {
            require_task(&tx, parent_id)?;
        }

        let task = Task {
            id: TaskId::new(),
            project_id: input.project_id,
            parent_task_id: input.parent_task_id,
            title: input.title,
            description: input.description,
            step_id: input.step_id,
            cancelled: false,
            task_type: input.task_type,
            plan_approved: false,
            output: None,
            worktree_path: None,
            branch: None,
            session_id: None,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        tasks::insert(&tx, &task)?;
        emit(
            &tx,
            &EventPayload::TaskCreated {
                task_id: task.id.clone(),
                project_id: task.project_id.clone(),
            },
            &now,
        )?;
        tx.commit()?;
        Ok(task)
    }

    /// Move a task to a different step, enforcing the state machine.
    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        target_step_id: &StepId,
    ) -> Result<Task, OpError> {
        let now = self.now();
        let tx = self.db_mut().transaction()?;
        let task = require_task(&tx, task_id)?;
        let current = require_step(&tx, &task.step_id)?;
        let target = require_step(&tx, target_step_id)?;

        let transition = validate_step_transition(&task, &current, &target)?;
        tasks::set_step(&tx, task_id, target_step_id, &now)?;
        emit_moved(&tx, &transition, &now)?;
        tx.commit()?;

        Ok(Task {
            step_id: target.id,
            updated_at: now,
            ..task
        })
    }

    pub fn cancel_task(&mut self, task_id: &TaskId) -> Result<Task, OpError> {
        let now = self.now();
        let tx = self.db_mut().transaction()?;
        let task = require_task(&tx, task_id)?;
        validate_cancel(&task)?;
        tasks::set_cancelled(&tx, task_id, true, &now)?;
        emit(
            &tx,
            &EventPayload::TaskCancelled {
                task_id: task_id.clone(),
            },
            &now,
        )?;
        tx.commit()?;
        Ok(Task {
            cancelled: true,
            updated_at: now,
            ..task
        })
    }

    pub fn uncancel_task(&mut self, task_id: &TaskId) -> Result<Task, OpError> {
        let now = self.now();
        let tx = self.db_mut().transaction()?;
        let task = require_task(&tx, task_id)?;
        validate_uncancel(&task)?;
        tasks::set_cancelled(&tx, task_id, false, &now)?;
        emit(
            &tx,
            &EventPayload::TaskUncancelled {
                task_id: task_id.clone(),
            },
            &now,
        )?;
        tx.commit()?;
        Ok(Task {
            cancelled: false,
            updated_at: now,
            ..task
        })
    }

    /// Set the output field on a task (research findings and the like).
    pub fn set_task_output(&mut self, task_id: &TaskId, output: &str) -> Result<Task, OpError> {
        let now = self.now();
        let tx = self.db_mut().transaction()?;
        let task = require_task(&tx, task_id)?;
        tasks::set_output(&tx, task_id, output, &now)?;
        emit(
            &tx,
            &EventPayload::TaskUpdated {
                task_id: task_id.clone(),
            },
            &now,
        )?;
        tx.commit()?;
        Ok(Task {
            output: Some(output.to_string()),
            updated_at: now,
            ..task
        })
    }

    /// Walk a task to the terminal step, unblock dependents, and run the
    /// sibling-completion check up the parent chain.
    pub fn complete_task(&mut self, task_id: &TaskId) -> Result<Task, OpError> {
        let now = self.now();
        let tx = self.db_mut().transaction()?;
        let task = require_task(&tx, task_id)?;
        if task.cancelled {
            return Err(ToolError::invalid_transition(format!(
                "task '{task_id}' is cancelled; uncancel it before completing"
            ))
            .into());
        }
        let current = require_step(&tx, &task.step_id)?;
        let Some(terminal) = steps::terminal_step(&tx, &task.project_id)? else {
            return Err(
                ToolError::invalid_input("project has no workflow steps").into()
            );
        };
        if current.position == terminal.position {
            return Err(ToolError::invalid_transition(format!(
                "task '{task_id}' is already at the terminal step '{}'",
                terminal.name
            ))
            .into());
        }

        // Completion is an explicit walk to done; the forward-only-by-one
        // rule applies to move_task, not here.
        tasks::set_step(&tx, task_id, &terminal.id, &now)?;
        let transition = StepTransition {
            task_id: task_id.clone(),
            project_id: task.project_id.clone(),
            from_step_id: current.id.clone(),
            from_step_name: current.name.clone(),
            from_position: current.position,
            to_step_id: terminal.id.clone(),
            to_step_name: terminal.name.clone(),
            to_position: terminal.position,
            direction: MoveDirection::Forward,
        };
        emit_moved(&tx, &transition, &now)?;

        cascade_unblock(&tx, task_id, &now)?;

        let completed = Task {
            step_id: terminal.id,
            updated_at: now.clone(),
            ..task
        };
        check_sibling_completion(&tx, &completed, &now)?;

        tx.commit()?;
        Ok(completed)
    }
}

pub(super) fn emit_moved(
    conn: &Connection,
    transition: &StepTransition,
    now: &str,
) -> Result<(), OpError> {
    emit(
        conn,
        &EventPayload::TaskMoved {
            task_id: transition.task_id.clone(),
            old_step_id: transition.from_step_id.clone(),
            new_step_id: transition.to_step_id.clone(),
            project_id: transition.project_id.clone(),
            from_step_name: transition.from_step_name.clone(),
            to_step_name: transition.to_step_name.clone(),
            from_position: transition.from_position,
            to_position: transition.to_position,
            direction: transition.direction,
        },
        now,
    )
}

/// Emit `task_ready` for every successor whose gates all just opened.
fn cascade_unblock(conn: &Connection, completed_id: &TaskId, now: &str) -> Result<(), OpError> {
    for successor in deps::ready_successors(conn, completed_id)? {
        emit(
            conn,
            &EventPayload::TaskReady {
                task_id: successor.id.clone(),
                project_id: successor.project_id.clone(),
            },
            now,
        )?;
    }
    Ok(())
}

/// When every non-cancelled child of the parent is terminal, advance the
/// parent one step; if that lands it at terminal, emit `milestone_completed`,
/// unblock the parent's dependents, and recurse upward.
fn check_sibling_completion(
    conn: &Connection,
    completed: &Task,
    now: &str,
) -> Result<(), OpError> {
    let Some(parent_id) = &completed.parent_task_id else {
        return Ok(());
    };
    let Some(parent) = fm_store::tasks::get(conn, parent_id)? else {
        return Ok(());
    };
    if parent.cancelled {
        return Ok(());
    }
    let Some(terminal_position) = steps::max_position(conn, &parent.project_id)? else {
        return Ok(());
    };

    let children = fm_store::tasks::children_of(conn, parent_id)?;
    let mut seen_active_child = false;
    for child in children.iter().filter(|c| !c.cancelled) {
        seen_active_child = true;
        let Some(step) = steps::get(conn, &child.step_id)? else {
            return Ok(());
        };
        if step.position != terminal_position {
            return Ok(());
        }
    }
    if !seen_active_child {
        return Ok(());
    }

    let parent_step = require_step(conn, &parent.step_id)?;
    let Some(next) =
        steps::step_at_position(conn, &parent.project_id, parent_step.position + 1)?
    else {
        return Ok(());
    };

    tasks::set_step(conn, parent_id, &next.id, now)?;
    let transition = StepTransition {
        task_id: parent_id.clone(),
        project_id: parent.project_id.clone(),
        from_step_id: parent_step.id.clone(),
        from_step_name: parent_step.name.clone(),
        from_position: parent_step.position,
        to_step_id: next.id.clone(),
        to_step_name: next.name.clone(),
        to_position: next.position,
        direction: MoveDirection::Forward,
    };
    emit_moved(conn, &transition, now)?;

    if next.position == terminal_position {
        emit(
            conn,
            &EventPayload::MilestoneCompleted {
                task_id: parent_id.clone(),
                project_id: parent.project_id.clone(),
            },
            now,
        )?;
        cascade_unblock(conn, parent_id, now)?;
        let advanced = Task {
            step_id: next.id,
            updated_at: now.to_string(),
            ..parent
        };
        check_sibling_completion(conn, &advanced, now)?;
    }
    Ok(())
}
