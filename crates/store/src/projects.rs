// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Project queries.

use crate::error::StoreError;
use fm_core::{Project, ProjectId, ProjectStatus};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::PathBuf;

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let status: String = row.get("status")?;
    Ok(Project {
        id: ProjectId::from_string(row.get::<_, String>("id")?),
        title: row.get("title")?,
        description: row.get("description")?,
        repo_path: row.get::<_, Option<String>>("repo_path")?.map(PathBuf::from),
        base_branch: row.get("base_branch")?,
        status: ProjectStatus::parse(&status).unwrap_or(ProjectStatus::Active),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert(conn: &Connection, project: &Project) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO projects (id, title, description, repo_path, base_branch, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            project.id.as_str(),
            project.title,
            project.description,
            project.repo_path.as_ref().map(|p| p.display().to_string()),
            project.base_branch,
            project.status.as_str(),
            project.created_at,
            project.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &ProjectId) -> Result<Option<Project>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT * FROM projects WHERE id = ?1",
            [id.as_str()],
            from_row,
        )
        .optional()?)
}

pub fn list(conn: &Connection) -> Result<Vec<Project>, StoreError> {
    let mut stmt = conn.prepare("SELECT * FROM projects ORDER BY created_at")?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn set_status(
    conn: &Connection,
    id: &ProjectId,
    status: ProjectStatus,
    now: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE projects SET status = ?1, updated_at = ?2 WHERE id = ?3",
        rusqlite::params![status.as_str(), now, id.as_str()],
    )?;
    Ok(())
}
