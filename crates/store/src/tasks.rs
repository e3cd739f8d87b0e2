// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Task queries.

use crate::error::StoreError;
use fm_core::{ProjectId, StepId, Task, TaskId, TaskType};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;
use std::path::PathBuf;

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let task_type: String = row.get("type")?;
    Ok(Task {
        id: TaskId::from_string(row.get::<_, String>("id")?),
        project_id: ProjectId::from_string(row.get::<_, String>("project_id")?),
        parent_task_id: row
            .get::<_, Option<String>>("parent_task_id")?
            .map(TaskId::from_string),
        title: row.get("title")?,
        description: row.get("description")?,
        step_id: StepId::from_string(row.get::<_, String>("step_id")?),
        cancelled: row.get("cancelled")?,
        task_type: TaskType::parse(&task_type).unwrap_or(TaskType::Task),
        plan_approved: row.get("plan_approved")?,
        output: row.get("output")?,
        worktree_path: row
            .get::<_, Option<String>>("worktree_path")?
            .map(PathBuf::from),
        branch: row.get("branch")?,
        session_id: row.get("session_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert(conn: &Connection, task: &Task) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO tasks
         (id, project_id, parent_task_id, title, description, step_id, cancelled, type,
          plan_approved, output, worktree_path, branch, session_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        rusqlite::params![
            task.id.as_str(),
            task.project_id.as_str(),
            task.parent_task_id.as_ref().map(|id| id.as_str()),
            task.title,
            task.description,
            task.step_id.as_str(),
            task.cancelled,
            task.task_type.as_str(),
            task.plan_approved,
            task.output,
            task.worktree_path.as_ref().map(|p| p.display().to_string()),
            task.branch,
            task.session_id,
            task.created_at,
            task.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &TaskId) -> Result<Option<Task>, StoreError> {
    Ok(conn
        .query_row("SELECT * FROM tasks WHERE id = ?1", [id.as_str()], from_row)
        .optional()?)
}

pub fn list_for_project(
    conn: &Connection,
    project_id: &ProjectId,
) -> Result<Vec<Task>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT * FROM tasks WHERE project_id = ?1 ORDER BY created_at")?;
    let rows = stmt.query_map([project_id.as_str()], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Non-cancelled tasks sitting at a step, oldest first.
pub fn list_at_step(conn: &Connection, step_id: &StepId) -> Result<Vec<Task>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT * FROM tasks WHERE step_id = ?1 AND cancelled = 0 ORDER BY created_at",
    )?;
    let rows = stmt.query_map([step_id.as_str()], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn children_of(conn: &Connection, parent_id: &TaskId) -> Result<Vec<Task>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT * FROM tasks WHERE parent_task_id = ?1 ORDER BY created_at")?;
    let rows = stmt.query_map([parent_id.as_str()], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn set_step(
    conn: &Connection,
    id: &TaskId,
    step_id: &StepId,
    now: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE tasks SET step_id = ?1, updated_at = ?2 WHERE id = ?3",
        rusqlite::params![step_id.as_str(), now, id.as_str()],
    )?;
    Ok(())
}

pub fn set_cancelled(
    conn: &Connection,
    id: &TaskId,
    cancelled: bool,
    now: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE tasks SET cancelled = ?1, updated_at = ?2 WHERE id = ?3",
        rusqlite::params![cancelled, now, id.as_str()],
    )?;
    Ok(())
}

pub fn set_plan_approved(conn: &Connection, id: &TaskId, now: &str) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE tasks SET plan_approved = 1, updated_at = ?1 WHERE id = ?2",
        rusqlite::params![now, id.as_str()],
    )?;
    Ok(())
}

pub fn set_output(
    conn: &Connection,
    id: &TaskId,
    output: &str,
    now: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE tasks SET output = ?1, updated_at = ?2 WHERE id = ?3",
        rusqlite::params![output, now, id.as_str()],
    )?;
    Ok(())
}

pub fn set_worktree(
    conn: &Connection,
    id: &TaskId,
    worktree_path: &Path,
    branch: &str,
    now: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE tasks SET worktree_path = ?1, branch = ?2, updated_at = ?3 WHERE id = ?4",
        rusqlite::params![worktree_path.display().to_string(), branch, now, id.as_str()],
    )?;
    Ok(())
}

/// Clear the worktree columns after the checkout is removed from disk.
pub fn clear_worktree(conn: &Connection, id: &TaskId, now: &str) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE tasks SET worktree_path = NULL, branch = NULL, updated_at = ?1 WHERE id = ?2",
        rusqlite::params![now, id.as_str()],
    )?;
    Ok(())
}

pub fn set_session(
    conn: &Connection,
    id: &TaskId,
    session_id: &str,
    now: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE tasks SET session_id = ?1, updated_at = ?2 WHERE id = ?3",
        rusqlite::params![session_id, now, id.as_str()],
    )?;
    Ok(())
}
