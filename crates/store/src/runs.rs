// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Agent run queries. A run is active until `completed_at` is set.

use crate::error::StoreError;
use fm_core::{AgentRun, RunId, StepId, TaskId};
use rusqlite::{Connection, OptionalExtension, Row};

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<AgentRun> {
    Ok(AgentRun {
        id: RunId::from_string(row.get::<_, String>("id")?),
        task_id: TaskId::from_string(row.get::<_, String>("task_id")?),
        step_id: StepId::from_string(row.get::<_, String>("step_id")?),
        started_at: row.get("started_at")?,
        completed_at: row.get("completed_at")?,
        exit_code: row.get("exit_code")?,
        error: row.get("error")?,
    })
}

/// Open a run row at dispatch.
pub fn insert(conn: &Connection, run: &AgentRun) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO agent_runs (id, task_id, step_id, started_at, completed_at, exit_code, error)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            run.id.as_str(),
            run.task_id.as_str(),
            run.step_id.as_str(),
            run.started_at,
            run.completed_at,
            run.exit_code,
            run.error,
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &RunId) -> Result<Option<AgentRun>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT * FROM agent_runs WHERE id = ?1",
            [id.as_str()],
            from_row,
        )
        .optional()?)
}

/// Close a run with the subprocess exit code.
pub fn complete(
    conn: &Connection,
    id: &RunId,
    exit_code: i64,
    now: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE agent_runs SET completed_at = ?1, exit_code = ?2 WHERE id = ?3",
        rusqlite::params![now, exit_code, id.as_str()],
    )?;
    Ok(())
}

/// Close a run that terminated exceptionally: exit code -1 plus the error.
pub fn fail(conn: &Connection, id: &RunId, error: &str, now: &str) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE agent_runs SET completed_at = ?1, exit_code = -1, error = ?2 WHERE id = ?3",
        rusqlite::params![now, error, id.as_str()],
    )?;
    Ok(())
}

/// Close a run with both an exit code and a captured stderr tail.
pub fn complete_with_error(
    conn: &Connection,
    id: &RunId,
    exit_code: i64,
    error: &str,
    now: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE agent_runs SET completed_at = ?1, exit_code = ?2, error = ?3 WHERE id = ?4",
        rusqlite::params![now, exit_code, error, id.as_str()],
    )?;
    Ok(())
}

pub fn has_active(conn: &Connection, task_id: &TaskId) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM agent_runs WHERE task_id = ?1 AND completed_at IS NULL",
        [task_id.as_str()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Total active runs across the board, gated against `max_parallel_agents`.
pub fn count_active(conn: &Connection) -> Result<i64, StoreError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM agent_runs WHERE completed_at IS NULL",
        [],
        |row| row.get(0),
    )?)
}

pub fn list_for_task(conn: &Connection, task_id: &TaskId) -> Result<Vec<AgentRun>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT * FROM agent_runs WHERE task_id = ?1 ORDER BY started_at")?;
    let rows = stmt.query_map([task_id.as_str()], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
