// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Dependency edge operations.

use super::{emit, require_task, ToolSurface};
use crate::deps as dep_engine;
use crate::error::OpError;
use fm_core::{
    Clock, DependencyId, EventPayload, Task, TaskDependency, TaskId, ToolError,
};
use fm_store::deps;
use serde::Serialize;

/// Both directions of a task's dependency neighborhood.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyView {
    pub task_id: TaskId,
    pub blocked: bool,
    pub predecessors: Vec<Task>,
    pub successors: Vec<Task>,
}

impl<C: Clock> ToolSurface<C> {
    /// Add `predecessor → successor`. Rejects self-loops, duplicates, and
    /// edges that would close a cycle.
    pub fn add_dependency(
        &mut self,
        predecessor_id: &TaskId,
        successor_id: &TaskId,
    ) -> Result<TaskDependency, OpError> {
        if predecessor_id == successor_id {
            return Err(ToolError::invalid_input("a task cannot depend on itself").into());
        }

        let now = self.now();
        let tx = self.db_mut().transaction()?;
        require_task(&tx, predecessor_id)?;
        require_task(&tx, successor_id)?;

        if deps::pair_exists(&tx, predecessor_id, successor_id)? {
            return Err(ToolError::invalid_input(format!(
                "dependency {predecessor_id} -> {successor_id} already exists"
            ))
            .into());
        }
        if dep_engine::would_create_cycle(&tx, predecessor_id, successor_id)? {
            return Err(ToolError::invalid_input(format!(
                "dependency {predecessor_id} -> {successor_id} would create a cycle"
            ))
            .into());
        }

        let dep = TaskDependency {
            id: DependencyId::new(),
            predecessor_id: predecessor_id.clone(),
            successor_id: successor_id.clone(),
            created_at: now.clone(),
        };
        deps::insert(&tx, &dep)?;
        emit(
            &tx,
            &EventPayload::DependencyCreated {
                dependency_id: dep.id.clone(),
                predecessor_id: dep.predecessor_id.clone(),
                successor_id: dep.successor_id.clone(),
            },
            &now,
        )?;
        tx.commit()?;
        Ok(dep)
    }

    pub fn remove_dependency(
        &mut self,
        dependency_id: &DependencyId,
    ) -> Result<TaskDependency, OpError> {
        let now = self.now();
        let tx = self.db_mut().transaction()?;
        let Some(dep) = deps::get(&tx, dependency_id)? else {
            return Err(
                ToolError::not_found(format!("dependency '{dependency_id}' not found")).into(),
            );
        };
        deps::remove(&tx, dependency_id)?;
        emit(
            &tx,
            &EventPayload::DependencyRemoved {
                dependency_id: dep.id.clone(),
                predecessor_id: dep.predecessor_id.clone(),
                successor_id: dep.successor_id.clone(),
            },
            &now,
        )?;
        tx.commit()?;
        Ok(dep)
    }

    pub fn get_dependencies(&self, task_id: &TaskId) -> Result<DependencyView, OpError> {
        let conn = self.db().conn();
        require_task(conn, task_id)?;
        Ok(DependencyView {
            task_id: task_id.clone(),
            blocked: dep_engine::is_blocked(conn, task_id)?,
            predecessors: deps::predecessors_of(conn, task_id)?,
            successors: deps::successors_of(conn, task_id)?,
        })
    }
}
