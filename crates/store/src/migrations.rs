// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Schema creation and migration.
//!
//! Migrations are idempotent: every `CREATE TABLE` uses `IF NOT EXISTS` and
//! additive column migrations probe `PRAGMA table_info` first. Tables are
//! created in dependency order so foreign keys resolve.

use crate::error::StoreError;
use rusqlite::Connection;

const TABLES: &[(&str, &str)] = &[
    (
        "projects",
        "CREATE TABLE IF NOT EXISTS projects (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            repo_path   TEXT,
            base_branch TEXT,
            status      TEXT NOT NULL DEFAULT 'active',
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        )",
    ),
    (
        "workflow_steps",
        "CREATE TABLE IF NOT EXISTS workflow_steps (
            id            TEXT PRIMARY KEY,
            project_id    TEXT NOT NULL REFERENCES projects(id),
            name          TEXT NOT NULL,
            position      INTEGER NOT NULL,
            system_prompt TEXT,
            model         TEXT,
            color         TEXT,
            created_at    TEXT NOT NULL,
            UNIQUE(project_id, position),
            UNIQUE(project_id, name)
        )",
    ),
    (
        "tasks",
        "CREATE TABLE IF NOT EXISTS tasks (
            id             TEXT PRIMARY KEY,
            project_id     TEXT NOT NULL REFERENCES projects(id),
            parent_task_id TEXT REFERENCES tasks(id),
            title          TEXT NOT NULL,
            description    TEXT NOT NULL DEFAULT '',
            step_id        TEXT NOT NULL REFERENCES workflow_steps(id),
            cancelled      INTEGER NOT NULL DEFAULT 0,
            type           TEXT NOT NULL DEFAULT 'task',
            plan_approved  INTEGER NOT NULL DEFAULT 0,
            output         TEXT,
            worktree_path  TEXT,
            branch         TEXT,
            session_id     TEXT,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        )",
    ),
    (
        "comments",
        "CREATE TABLE IF NOT EXISTS comments (
            id          TEXT PRIMARY KEY,
            task_id     TEXT NOT NULL REFERENCES tasks(id),
            author_role TEXT NOT NULL,
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL
        )",
    ),
    (
        "agent_runs",
        "CREATE TABLE IF NOT EXISTS agent_runs (
            id           TEXT PRIMARY KEY,
            task_id      TEXT NOT NULL REFERENCES tasks(id),
            step_id      TEXT NOT NULL REFERENCES workflow_steps(id),
            started_at   TEXT NOT NULL,
            completed_at TEXT,
            exit_code    INTEGER,
            error        TEXT
        )",
    ),
    (
        "task_dependencies",
        "CREATE TABLE IF NOT EXISTS task_dependencies (
            id             TEXT PRIMARY KEY,
            predecessor_id TEXT NOT NULL REFERENCES tasks(id),
            successor_id   TEXT NOT NULL REFERENCES tasks(id),
            created_at     TEXT NOT NULL,
            UNIQUE(predecessor_id, successor_id),
            CHECK(predecessor_id <> successor_id)
        )",
    ),
    (
        "events",
        "CREATE TABLE IF NOT EXISTS events (
            id                      TEXT PRIMARY KEY,
            type                    TEXT NOT NULL,
            payload                 TEXT NOT NULL,
            created_at              TEXT NOT NULL,
            consumed_by_broadcaster INTEGER NOT NULL DEFAULT 0,
            consumed_by_trigger     INTEGER NOT NULL DEFAULT 0
        )",
    ),
];

/// Columns added after the initial schema shipped. Each is probed before the
/// `ALTER TABLE` so re-running is a no-op on both old and new databases.
const ADDED_COLUMNS: &[(&str, &str, &str)] = &[
    ("tasks", "type", "TEXT NOT NULL DEFAULT 'task'"),
    ("tasks", "plan_approved", "INTEGER NOT NULL DEFAULT 0"),
    ("tasks", "output", "TEXT"),
    ("projects", "repo_path", "TEXT"),
    ("projects", "base_branch", "TEXT"),
];

/// Create all tables in dependency order and apply additive migrations.
/// Idempotent.
pub fn run(conn: &Connection) -> Result<(), StoreError> {
    for (name, ddl) in TABLES {
        conn.execute_batch(ddl)?;
        tracing::trace!(table = name, "ensured table");
    }

    for (table, column, decl) in ADDED_COLUMNS {
        if !column_exists(conn, table, column)? {
            conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl}"))?;
            tracing::debug!(table, column, "added column");
        }
    }

    Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
