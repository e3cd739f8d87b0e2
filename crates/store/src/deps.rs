// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Task dependency edge queries.

use crate::error::StoreError;
use crate::tasks;
use fm_core::{DependencyId, Task, TaskDependency, TaskId};
use rusqlite::{Connection, OptionalExtension, Row};

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<TaskDependency> {
    Ok(TaskDependency {
        id: DependencyId::from_string(row.get::<_, String>("id")?),
        predecessor_id: TaskId::from_string(row.get::<_, String>("predecessor_id")?),
        successor_id: TaskId::from_string(row.get::<_, String>("successor_id")?),
        created_at: row.get("created_at")?,
    })
}

pub fn insert(conn: &Connection, dep: &TaskDependency) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO task_dependencies (id, predecessor_id, successor_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            dep.id.as_str(),
            dep.predecessor_id.as_str(),
            dep.successor_id.as_str(),
            dep.created_at,
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &DependencyId) -> Result<Option<TaskDependency>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT * FROM task_dependencies WHERE id = ?1",
            [id.as_str()],
            from_row,
        )
        .optional()?)
}

pub fn remove(conn: &Connection, id: &DependencyId) -> Result<(), StoreError> {
    conn.execute(
        "DELETE FROM task_dependencies WHERE id = ?1",
        [id.as_str()],
    )?;
    Ok(())
}

pub fn pair_exists(
    conn: &Connection,
    predecessor_id: &TaskId,
    successor_id: &TaskId,
) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM task_dependencies
         WHERE predecessor_id = ?1 AND successor_id = ?2",
        rusqlite::params![predecessor_id.as_str(), successor_id.as_str()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Successor ids reachable one hop forward from `task_id`.
pub fn successor_ids(conn: &Connection, task_id: &TaskId) -> Result<Vec<TaskId>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT successor_id FROM task_dependencies WHERE predecessor_id = ?1")?;
    let rows = stmt.query_map([task_id.as_str()], |row| {
        Ok(TaskId::from_string(row.get::<_, String>(0)?))
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Predecessor tasks of `task_id`, joined to their rows.
pub fn predecessors_of(conn: &Connection, task_id: &TaskId) -> Result<Vec<Task>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT t.* FROM tasks t
         JOIN task_dependencies d ON d.predecessor_id = t.id
         WHERE d.successor_id = ?1
         ORDER BY t.created_at",
    )?;
    let rows = stmt.query_map([task_id.as_str()], tasks::from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Successor tasks of `task_id`, joined to their rows.
pub fn successors_of(conn: &Connection, task_id: &TaskId) -> Result<Vec<Task>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT t.* FROM tasks t
         JOIN task_dependencies d ON d.successor_id = t.id
         WHERE d.predecessor_id = ?1
         ORDER BY t.created_at",
    )?;
    let rows = stmt.query_map([task_id.as_str()], tasks::from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Edges touching a task, for the `get_dependencies` read.
pub fn edges_for_task(
    conn: &Connection,
    task_id: &TaskId,
) -> Result<Vec<TaskDependency>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT * FROM task_dependencies
         WHERE predecessor_id = ?1 OR successor_id = ?1
         ORDER BY created_at",
    )?;
    let rows = stmt.query_map([task_id.as_str()], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
