// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::*;
use tempfile::TempDir;

#[test]
fn open_enables_wal_and_foreign_keys() {
    let dir = TempDir::new().unwrap();
    let db = Db::open(&dir.path().join("foreman.db")).unwrap();

    let mode: String = db
        .conn()
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode, "wal");

    let fk: i64 = db
        .conn()
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn open_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a/b/foreman.db");
    Db::init(&nested).unwrap();
    assert!(nested.exists());
}

#[test]
fn foreign_keys_reject_dangling_references() {
    let db = Db::open_in_memory().unwrap();
    let err = db.conn().execute(
        "INSERT INTO workflow_steps (id, project_id, name, position, created_at)
         VALUES ('s1', 'missing-project', 'Plan', 0, '2026-01-01T00:00:00Z')",
        [],
    );
    assert!(err.is_err());
}

#[test]
fn transaction_rolls_back_as_a_unit() {
    let mut db = Db::open_in_memory().unwrap();
    {
        let tx = db.transaction().unwrap();
        tx.execute(
            "INSERT INTO projects (id, title, created_at, updated_at)
             VALUES ('p1', 't', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        tx.execute(
            "INSERT INTO events (id, type, payload, created_at)
             VALUES ('e1', 'project_created', '{}', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        // Dropped without commit.
    }
    let projects: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
        .unwrap();
    let events: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
        .unwrap();
    assert_eq!((projects, events), (0, 0));
}
