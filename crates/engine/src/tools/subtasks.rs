// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Bulk subtask creation with atomic dependency wiring.

use super::{emit, require_task, ToolSurface};
use crate::deps as dep_engine;
use crate::error::OpError;
use fm_core::{
    BatchDependency, Clock, EventPayload, StepId, SubtaskSpec, Task, TaskDependency, TaskId,
    ToolError,
};
use fm_store::{deps, steps, tasks};
use rusqlite::Connection;

impl<C: Clock> ToolSurface<C> {
    /// Create subtasks under a parent.
    ///
    /// Children default to the parent's next step; when the parent is at
    /// terminal they default to the project's first agent step. Intra-batch
    /// `dependencies` edges are written *before* any `task_created` event so
    /// the trigger processor never races an unblocked child.
    /// `cascade_deps_from` re-blocks that task's successors on every newly
    /// created child.
    pub fn create_subtasks(
        &mut self,
        parent_task_id: &TaskId,
        specs: &[SubtaskSpec],
        default_step_id: Option<&StepId>,
        dependencies: &[BatchDependency],
        cascade_deps_from: Option<&TaskId>,
    ) -> Result<Vec<Task>, OpError> {
        if specs.is_empty() {
            return Err(ToolError::invalid_input("tasks list must not be empty").into());
        }
        for dep in dependencies {
            if dep.from_index >= specs.len() || dep.to_index >= specs.len() {
                return Err(ToolError::invalid_input(format!(
                    "dependency index out of range: {} -> {}",
                    dep.from_index, dep.to_index
                ))
                .into());
            }
            if dep.from_index == dep.to_index {
                return Err(ToolError::invalid_input(
                    "a task cannot depend on itself",
                )
                .into());
            }
        }

        let now = self.now();
        let tx = self.db_mut().transaction()?;
        let parent = require_task(&tx, parent_task_id)?;
        if let Some(cascade_from) = cascade_deps_from {
            require_task(&tx, cascade_from)?;
        }

        let default_step = resolve_default_step(&tx, &parent, default_step_id)?;

        let mut created = Vec::with_capacity(specs.len());
        for spec in specs {
            let step_id = match &spec.step_id {
                Some(explicit) => {
                    let step = super::require_step(&tx, explicit)?;
                    if step.project_id != parent.project_id {
                        return Err(ToolError::invalid_input(format!(
                            "step '{explicit}' belongs to a different project"
                        ))
                        .into());
                    }
                    explicit.clone()
                }
                None => default_step.clone(),
            };
            let task = Task {
                id: TaskId::new(),
                project_id: parent.project_id.clone(),
                parent_task_id: Some(parent_task_id.clone()),
                title: spec.title.clone(),
                description: spec.description.clone(),
                step_id,
                cancelled: false,
                task_type: spec.task_type,
                plan_approved: false,
                output: None,
                worktree_path: None,
                branch: None,
                session_id: None,
                created_at: now.clone(),
                updated_at: now.clone(),
            };
            tasks::insert(&tx, &task)?;
            created.push(task);
        }

        // Wire the batch edges before any task_created event exists.
        for dep in dependencies {
            add_edge(
                &tx,
                &created[dep.from_index].id,
                &created[dep.to_index].id,
                &now,
            )?;
        }
        if let Some(cascade_from) = cascade_deps_from {
            for successor_id in deps::successor_ids(&tx, cascade_from)? {
                for child in &created {
                    if deps::pair_exists(&tx, &child.id, &successor_id)? {
                        continue;
                    }
                    add_edge(&tx, &child.id, &successor_id, &now)?;
                }
            }
        }

        emit(
            &tx,
            &EventPayload::SubtasksCreated {
                parent_task_id: parent_task_id.clone(),
                task_ids: created.iter().map(|t| t.id.clone()).collect(),
            },
            &now,
        )?;
        for task in &created {
            emit(
                &tx,
                &EventPayload::TaskCreated {
                    task_id: task.id.clone(),
                    project_id: task.project_id.clone(),
                },
                &now,
            )?;
        }

        tx.commit()?;
        Ok(created)
    }
}

/// Child step default: the parent's next step, or the first agent step when
/// the parent is already terminal, or the parent's own step as a last
/// resort.
fn resolve_default_step(
    conn: &Connection,
    parent: &Task,
    default_step_id: Option<&StepId>,
) -> Result<StepId, OpError> {
    if let Some(explicit) = default_step_id {
        let step = super::require_step(conn, explicit)?;
        if step.project_id != parent.project_id {
            return Err(ToolError::invalid_input(format!(
                "default_step_id '{explicit}' belongs to a different project"
            ))
            .into());
        }
        return Ok(explicit.clone());
    }

    let parent_step = super::require_step(conn, &parent.step_id)?;
    if let Some(next) =
        steps::step_at_position(conn, &parent.project_id, parent_step.position + 1)?
    {
        return Ok(next.id);
    }
    if let Some(first_agent) = steps::first_agent_step(conn, &parent.project_id)? {
        return Ok(first_agent.id);
    }
    Ok(parent.step_id.clone())
}

/// Insert one dependency edge, silently (no event) but cycle-checked; the
/// whole batch rolls back on a bad edge.
fn add_edge(
    conn: &Connection,
    predecessor_id: &TaskId,
    successor_id: &TaskId,
    now: &str,
) -> Result<(), OpError> {
    if dep_engine::would_create_cycle(conn, predecessor_id, successor_id)? {
        return Err(ToolError::invalid_input(format!(
            "dependency {predecessor_id} -> {successor_id} would create a cycle"
        ))
        .into());
    }
    deps::insert(
        conn,
        &TaskDependency {
            id: fm_core::DependencyId::new(),
            predecessor_id: predecessor_id.clone(),
            successor_id: successor_id.clone(),
            created_at: now.to_string(),
        },
    )?;
    Ok(())
}
