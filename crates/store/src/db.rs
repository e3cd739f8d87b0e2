// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Connection handle. Every connection enables WAL mode and foreign keys.

use crate::error::StoreError;
use crate::migrations;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::time::Duration;

pub struct Db {
    conn: Connection,
}

impl Db {
    /// Open a connection with WAL journaling, foreign keys, and a busy
    /// timeout. Parent directories are created as needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let conn = Connection::open(path)?;
        configure(&conn)?;
        Ok(Self { conn })
    }

    /// Open and run migrations: the ready-to-use handle.
    pub fn init(path: &Path) -> Result<Self, StoreError> {
        let db = Self::open(path)?;
        migrations::run(db.conn())?;
        Ok(db)
    }

    /// In-memory database for tests. Foreign keys enabled, no WAL (memory
    /// databases have no journal file).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON")?;
        migrations::run(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a write transaction. Data writes and the corresponding event
    /// insert must commit together through this.
    pub fn transaction(&mut self) -> Result<Transaction<'_>, StoreError> {
        Ok(self.conn.transaction()?)
    }
}

fn configure(conn: &Connection) -> Result<(), StoreError> {
    // journal_mode returns a result row; query it rather than execute.
    let _mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    conn.execute_batch("PRAGMA foreign_keys=ON")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(())
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
