// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Event log queries.
//!
//! One table, two independent consumption cursors: the broadcaster and the
//! trigger processor each mark rows consumed on their own column, so neither
//! blocks the other and replay is per-consumer. Rows are never deleted here;
//! retention is an operational concern.

use crate::error::StoreError;
use fm_core::event::TRIGGER_KINDS;
use fm_core::{Event, EventId, EventPayload};
use rusqlite::{Connection, Row};

fn from_row(row: &Row<'_>) -> rusqlite::Result<(EventId, String, String, bool, bool)> {
    Ok((
        EventId::from_string(row.get::<_, String>("id")?),
        row.get("payload")?,
        row.get("created_at")?,
        row.get("consumed_by_broadcaster")?,
        row.get("consumed_by_trigger")?,
    ))
}

fn decode(
    (id, payload, created_at, consumed_by_broadcaster, consumed_by_trigger): (
        EventId,
        String,
        String,
        bool,
        bool,
    ),
) -> Result<Event, StoreError> {
    let payload: EventPayload = serde_json::from_str(&payload)?;
    Ok(Event {
        id,
        payload,
        created_at,
        consumed_by_broadcaster,
        consumed_by_trigger,
    })
}

/// Insert an event row. The caller owns the transaction so the data write
/// and the event land together.
pub fn insert(
    conn: &Connection,
    id: &EventId,
    payload: &EventPayload,
    now: &str,
) -> Result<(), StoreError> {
    let body = serde_json::to_string(payload)?;
    conn.execute(
        "INSERT INTO events (id, type, payload, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![id.as_str(), payload.kind(), body, now],
    )?;
    Ok(())
}

/// All events the broadcaster has not consumed, in creation order.
pub fn unconsumed_for_broadcaster(conn: &Connection) -> Result<Vec<Event>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT * FROM events WHERE consumed_by_broadcaster = 0
         ORDER BY created_at, rowid",
    )?;
    let rows = stmt.query_map([], from_row)?;
    rows.map(|row| decode(row?))
        .collect::<Result<Vec<_>, _>>()
}

/// Trigger-relevant events the trigger processor has not consumed, in
/// creation order. Filtered to [`TRIGGER_KINDS`] in SQL so unrelated kinds
/// never reach the scheduler.
pub fn unconsumed_for_trigger(conn: &Connection) -> Result<Vec<Event>, StoreError> {
    let placeholders = vec!["?"; TRIGGER_KINDS.len()].join(", ");
    let sql = format!(
        "SELECT * FROM events WHERE consumed_by_trigger = 0 AND type IN ({placeholders})
         ORDER BY created_at, rowid"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(TRIGGER_KINDS.iter()), from_row)?;
    rows.map(|row| decode(row?))
        .collect::<Result<Vec<_>, _>>()
}

pub fn mark_broadcast_consumed(conn: &Connection, id: &EventId) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE events SET consumed_by_broadcaster = 1 WHERE id = ?1",
        [id.as_str()],
    )?;
    Ok(())
}

pub fn mark_trigger_consumed(conn: &Connection, id: &EventId) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE events SET consumed_by_trigger = 1 WHERE id = ?1",
        [id.as_str()],
    )?;
    Ok(())
}

/// Every event row, for tests and diagnostics.
pub fn list_all(conn: &Connection) -> Result<Vec<Event>, StoreError> {
    let mut stmt = conn.prepare("SELECT * FROM events ORDER BY created_at, rowid")?;
    let rows = stmt.query_map([], from_row)?;
    rows.map(|row| decode(row?))
        .collect::<Result<Vec<_>, _>>()
}

pub fn count_of_kind(conn: &Connection, kind: &str) -> Result<i64, StoreError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM events WHERE type = ?1",
        [kind],
        |row| row.get(0),
    )?)
}
