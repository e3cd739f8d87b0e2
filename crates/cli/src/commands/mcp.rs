// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! `foreman mcp`: serve the tool surface on stdio for one agent session.
//!
//! The store path resolves from `--db`, then `$FOREMAN_DB`, then the config
//! file; the task scope from `--task-id` or `$FOREMAN_TASK_ID`. The agent
//! runner launches this command via the back-channel config it writes.

use crate::exit_error::ExitError;
use fm_server::ToolServer;
use fm_store::Db;
use std::path::{Path, PathBuf};
use tokio::io::BufReader;

pub async fn run(
    config_path: Option<&Path>,
    task_id: Option<String>,
    db: Option<PathBuf>,
) -> Result<(), ExitError> {
    let db_path = resolve_db_path(config_path, db)?;
    let scope_task = task_id
        .or_else(|| std::env::var("FOREMAN_TASK_ID").ok())
        .map(Into::into);

    let db = Db::init(&db_path)?;
    let mut server = ToolServer::new(db, scope_task);
    // The config file is optional here ($FOREMAN_DB alone is enough for an
    // agent session); when present its default workflow applies.
    if let Ok(config) = super::load_config(config_path) {
        if let Some(workflow) = config.default_workflow {
            server = server.with_default_workflow(workflow);
        }
    }
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    server
        .serve(stdin, stdout)
        .await
        .map_err(|e| ExitError::new(1, e.to_string()))
}

fn resolve_db_path(
    config_path: Option<&Path>,
    db: Option<PathBuf>,
) -> Result<PathBuf, ExitError> {
    if let Some(db) = db {
        return Ok(db);
    }
    if let Ok(db) = std::env::var("FOREMAN_DB") {
        return Ok(PathBuf::from(db));
    }
    Ok(super::load_config(config_path)?.db_path)
}
