// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Workflow step queries.
//!
//! Positions form a dense ordered sequence per project; the step with the
//! largest position is the terminal "done" column.

use crate::error::StoreError;
use fm_core::{ProjectId, StepId, WorkflowStep};
use rusqlite::{Connection, OptionalExtension, Row};

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<WorkflowStep> {
    Ok(WorkflowStep {
        id: StepId::from_string(row.get::<_, String>("id")?),
        project_id: ProjectId::from_string(row.get::<_, String>("project_id")?),
        name: row.get("name")?,
        position: row.get("position")?,
        system_prompt: row.get("system_prompt")?,
        model: row.get("model")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert(conn: &Connection, step: &WorkflowStep) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO workflow_steps (id, project_id, name, position, system_prompt, model, color, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            step.id.as_str(),
            step.project_id.as_str(),
            step.name,
            step.position,
            step.system_prompt,
            step.model,
            step.color,
            step.created_at,
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &StepId) -> Result<Option<WorkflowStep>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT * FROM workflow_steps WHERE id = ?1",
            [id.as_str()],
            from_row,
        )
        .optional()?)
}

pub fn list_for_project(
    conn: &Connection,
    project_id: &ProjectId,
) -> Result<Vec<WorkflowStep>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT * FROM workflow_steps WHERE project_id = ?1 ORDER BY position")?;
    let rows = stmt.query_map([project_id.as_str()], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Terminal position for a project, if it has any steps.
pub fn max_position(conn: &Connection, project_id: &ProjectId) -> Result<Option<i64>, StoreError> {
    Ok(conn.query_row(
        "SELECT MAX(position) FROM workflow_steps WHERE project_id = ?1",
        [project_id.as_str()],
        |row| row.get::<_, Option<i64>>(0),
    )?)
}

pub fn terminal_step(
    conn: &Connection,
    project_id: &ProjectId,
) -> Result<Option<WorkflowStep>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT * FROM workflow_steps WHERE project_id = ?1
             ORDER BY position DESC LIMIT 1",
            [project_id.as_str()],
            from_row,
        )
        .optional()?)
}

pub fn step_at_position(
    conn: &Connection,
    project_id: &ProjectId,
    position: i64,
) -> Result<Option<WorkflowStep>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT * FROM workflow_steps WHERE project_id = ?1 AND position = ?2",
            rusqlite::params![project_id.as_str(), position],
            from_row,
        )
        .optional()?)
}

/// First step in the project with an agent configured.
pub fn first_agent_step(
    conn: &Connection,
    project_id: &ProjectId,
) -> Result<Option<WorkflowStep>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT * FROM workflow_steps
             WHERE project_id = ?1 AND system_prompt IS NOT NULL
             ORDER BY position LIMIT 1",
            [project_id.as_str()],
            from_row,
        )
        .optional()?)
}

/// Next agent step strictly after `position`.
pub fn next_agent_step_after(
    conn: &Connection,
    project_id: &ProjectId,
    position: i64,
) -> Result<Option<WorkflowStep>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT * FROM workflow_steps
             WHERE project_id = ?1 AND position > ?2 AND system_prompt IS NOT NULL
             ORDER BY position LIMIT 1",
            rusqlite::params![project_id.as_str(), position],
            from_row,
        )
        .optional()?)
}
