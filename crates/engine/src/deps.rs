// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Dependency engine: cycle detection, block evaluation, cascade unblock.
//!
//! Edges are directed `predecessor → successor`. The induced graph must stay
//! acyclic; `add_dependency` consults [`would_create_cycle`] before writing.

use fm_store::{deps, runs, steps, tasks, StoreError};
use fm_core::{Task, TaskId};
use rusqlite::Connection;
use std::collections::{HashSet, VecDeque};

/// Would inserting `predecessor → successor` close a cycle?
///
/// Forward reachability search from `successor`; if `predecessor` is
/// reachable the new edge would complete a loop.
pub fn would_create_cycle(
    conn: &Connection,
    predecessor_id: &TaskId,
    successor_id: &TaskId,
) -> Result<bool, StoreError> {
    let mut seen: HashSet<TaskId> = HashSet::new();
    let mut queue: VecDeque<TaskId> = VecDeque::new();
    queue.push_back(successor_id.clone());

    while let Some(current) = queue.pop_front() {
        if &current == predecessor_id {
            return Ok(true);
        }
        if !seen.insert(current.clone()) {
            continue;
        }
        for next in deps::successor_ids(conn, &current)? {
            queue.push_back(next);
        }
    }
    Ok(false)
}

/// A task is blocked while any predecessor sits short of its project's
/// terminal step position.
pub fn is_blocked(conn: &Connection, task_id: &TaskId) -> Result<bool, StoreError> {
    for predecessor in deps::predecessors_of(conn, task_id)? {
        if !at_terminal(conn, &predecessor)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// A task's parent milestone (when it has one) gates dispatch until the plan
/// is approved. Tasks without a parent, or with a non-milestone parent, pass.
pub fn is_parent_approved(conn: &Connection, task: &Task) -> Result<bool, StoreError> {
    let Some(parent_id) = &task.parent_task_id else {
        return Ok(true);
    };
    let Some(parent) = tasks::get(conn, parent_id)? else {
        return Ok(true);
    };
    if !parent.is_milestone() {
        return Ok(true);
    }
    Ok(parent.plan_approved)
}

/// Successors of a just-completed task that are now ready to run: every
/// predecessor terminal, parent milestone (if any) approved, not cancelled.
pub fn ready_successors(
    conn: &Connection,
    completed_id: &TaskId,
) -> Result<Vec<Task>, StoreError> {
    let mut ready = Vec::new();
    for successor in deps::successors_of(conn, completed_id)? {
        if successor.cancelled {
            continue;
        }
        if is_blocked(conn, &successor.id)? {
            continue;
        }
        if !is_parent_approved(conn, &successor)? {
            continue;
        }
        ready.push(successor);
    }
    Ok(ready)
}

/// All gating facts the trigger processor needs for one dispatch decision.
#[derive(Debug, Clone)]
pub struct DispatchGate {
    pub has_active_run: bool,
    pub parent_approved: bool,
    pub blocked: bool,
    pub at_capacity: bool,
}

pub fn dispatch_gate(
    conn: &Connection,
    task: &Task,
    max_parallel_agents: usize,
) -> Result<DispatchGate, StoreError> {
    Ok(DispatchGate {
        has_active_run: runs::has_active(conn, &task.id)?,
        parent_approved: is_parent_approved(conn, task)?,
        blocked: is_blocked(conn, &task.id)?,
        at_capacity: runs::count_active(conn)? >= max_parallel_agents as i64,
    })
}

fn at_terminal(conn: &Connection, task: &Task) -> Result<bool, StoreError> {
    let Some(step) = steps::get(conn, &task.step_id)? else {
        return Ok(false);
    };
    let Some(max) = steps::max_position(conn, &task.project_id)? else {
        return Ok(false);
    };
    Ok(step.position == max)
}

#[cfg(test)]
#[path = "deps_tests.rs"]
mod tests;
