// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Milestone approval.

use super::{emit, require_task, ToolSurface};
use crate::deps as dep_engine;
use crate::error::OpError;
use fm_core::{Clock, EventPayload, Task, TaskId, ToolError};
use fm_store::tasks;

impl<C: Clock> ToolSurface<C> {
    /// Approve a milestone's plan, enabling dispatch of its children.
    ///
    /// Emits `plan_approved` plus one `task_ready` per non-blocked,
    /// non-cancelled child. Approval is one-way: false → true.
    pub fn approve_plan(&mut self, task_id: &TaskId) -> Result<Task, OpError> {
        let now = self.now();
        let tx = self.db_mut().transaction()?;
        let task = require_task(&tx, task_id)?;

        if !task.is_milestone() {
            return Err(ToolError::invalid_input(format!(
                "task '{task_id}' is a {}, only milestones have plans to approve",
                task.task_type
            ))
            .into());
        }
        if task.plan_approved {
            return Err(ToolError::invalid_input(format!(
                "milestone '{task_id}' is already approved"
            ))
            .into());
        }
        let children = tasks::children_of(&tx, task_id)?;
        if children.is_empty() {
            return Err(ToolError::invalid_input(format!(
                "milestone '{task_id}' has no children to dispatch"
            ))
            .into());
        }

        tasks::set_plan_approved(&tx, task_id, &now)?;
        emit(
            &tx,
            &EventPayload::PlanApproved {
                task_id: task_id.clone(),
                project_id: task.project_id.clone(),
            },
            &now,
        )?;
        for child in &children {
            if child.cancelled {
                continue;
            }
            if dep_engine::is_blocked(&tx, &child.id)? {
                continue;
            }
            emit(
                &tx,
                &EventPayload::TaskReady {
                    task_id: child.id.clone(),
                    project_id: child.project_id.clone(),
                },
                &now,
            )?;
        }
        tx.commit()?;
        Ok(Task {
            plan_approved: true,
            updated_at: now,
            ..task
        })
    }
}
