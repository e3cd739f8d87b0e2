// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Event broadcaster: fan-out of enriched events to connected listeners.
//!
//! A separate poll loop with its own store handle and its own consumption
//! cursor. Accept paths hand new listeners to the loop through a queue; the
//! listener set is only ever touched from inside the loop. A listener whose
//! channel is gone is dropped silently.

use crate::context::EngineContext;
use crate::error::EngineError;
use fm_core::{Event, EventPayload};
use fm_store::{comments, events, projects, tasks, Db};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub const BROADCAST_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Queue depth per listener before sends start failing it.
const LISTENER_BUFFER: usize = 256;

/// Handed to accept paths (the websocket endpoint); registering returns the
/// receiving half of the new listener's channel.
#[derive(Clone)]
pub struct ListenerRegistrar {
    tx: mpsc::Sender<mpsc::Sender<Value>>,
}

impl ListenerRegistrar {
    /// Register a new listener. Returns `None` once the broadcaster is gone.
    pub async fn register(&self) -> Option<mpsc::Receiver<Value>> {
        let (tx, rx) = mpsc::channel(LISTENER_BUFFER);
        self.tx.send(tx).await.ok()?;
        Some(rx)
    }
}

pub struct Broadcaster {
    db: Db,
    listeners: Vec<mpsc::Sender<Value>>,
    accept_rx: mpsc::Receiver<mpsc::Sender<Value>>,
}

impl Broadcaster {
    pub fn new(ctx: &EngineContext) -> Result<(Self, ListenerRegistrar), EngineError> {
        let db = ctx.open_db()?;
        let (accept_tx, accept_rx) = mpsc::channel(16);
        Ok((
            Self {
                db,
                listeners: Vec::new(),
                accept_rx,
            },
            ListenerRegistrar { tx: accept_tx },
        ))
    }

    /// Poll until cancelled. Tick failures are logged; the loop continues.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            if let Err(e) = self.tick().await {
                tracing::error!(error = %e, "broadcast tick failed");
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(BROADCAST_POLL_INTERVAL) => {}
            }
        }
        tracing::debug!("event broadcaster stopped");
    }

    /// One poll iteration, exposed for tests.
    pub async fn tick(&mut self) -> Result<(), EngineError> {
        while let Ok(listener) = self.accept_rx.try_recv() {
            self.listeners.push(listener);
        }

        for event in events::unconsumed_for_broadcaster(self.db.conn())? {
            let message = enrich(self.db.conn(), &event)?;
            let mut alive = Vec::with_capacity(self.listeners.len());
            for listener in self.listeners.drain(..) {
                // A full or closed channel drops the listener silently.
                if listener.try_send(message.clone()).is_ok() {
                    alive.push(listener);
                }
            }
            self.listeners = alive;
            events::mark_broadcast_consumed(self.db.conn(), &event.id)?;
        }
        Ok(())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Build the outbound message for one event, swapping bare ids for complete
/// entity objects where clients want them. Falls back to the raw payload.
pub fn enrich(conn: &Connection, event: &Event) -> Result<Value, EngineError> {
    let kind = event.payload.kind();
    let raw = serde_json::to_value(&event.payload).unwrap_or(Value::Null);

    let payload = match &event.payload {
        EventPayload::TaskCreated { task_id, .. }
        | EventPayload::TaskCancelled { task_id }
        | EventPayload::TaskUncancelled { task_id }
        | EventPayload::TaskUpdated { task_id }
        | EventPayload::TaskReady { task_id, .. }
        | EventPayload::PlanApproved { task_id, .. }
        | EventPayload::MilestoneCompleted { task_id, .. } => tasks::get(conn, task_id)?
            .map(|task| serde_json::to_value(task).unwrap_or(Value::Null)),

        EventPayload::CommentAdded { comment_id, .. } => comments::get(conn, comment_id)?
            .map(|comment| serde_json::to_value(comment).unwrap_or(Value::Null)),

        EventPayload::ProjectCreated { project_id }
        | EventPayload::ProjectCancelled { project_id } => projects::get(conn, project_id)?
            .map(|project| serde_json::to_value(project).unwrap_or(Value::Null)),

        // task_moved is already enriched with names and positions; edges and
        // batches go out as-is.
        _ => None,
    };

    Ok(json!({
        "type": kind,
        "payload": payload.unwrap_or(raw),
    }))
}

#[cfg(test)]
#[path = "broadcaster_tests.rs"]
mod tests;
