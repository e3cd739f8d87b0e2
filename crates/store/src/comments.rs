// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Comment queries. The thread is append-only.

use crate::error::StoreError;
use fm_core::{Comment, CommentId, TaskId};
use rusqlite::{Connection, OptionalExtension, Row};

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: CommentId::from_string(row.get::<_, String>("id")?),
        task_id: TaskId::from_string(row.get::<_, String>("task_id")?),
        author_role: row.get("author_role")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert(conn: &Connection, comment: &Comment) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO comments (id, task_id, author_role, content, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            comment.id.as_str(),
            comment.task_id.as_str(),
            comment.author_role,
            comment.content,
            comment.created_at,
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &CommentId) -> Result<Option<Comment>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT * FROM comments WHERE id = ?1",
            [id.as_str()],
            from_row,
        )
        .optional()?)
}

/// Chronological thread for a task.
pub fn list_for_task(conn: &Connection, task_id: &TaskId) -> Result<Vec<Comment>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT * FROM comments WHERE task_id = ?1 ORDER BY created_at")?;
    let rows = stmt.query_map([task_id.as_str()], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn count_for_task(conn: &Connection, task_id: &TaskId) -> Result<i64, StoreError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM comments WHERE task_id = ?1",
        [task_id.as_str()],
        |row| row.get(0),
    )?)
}
