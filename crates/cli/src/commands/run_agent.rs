// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! `foreman run-agent`: one-shot dispatch of a single task.

use crate::exit_error::ExitError;
use fm_engine::EngineContext;
use fm_store::Db;
use serde_json::json;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, task_id: &str) -> Result<(), ExitError> {
    let config = super::load_config(config_path)?;
    Db::init(&config.db_path)?;
    let ctx = EngineContext::new(config);

    let outcome = fm_engine::launch_agent(&ctx, &task_id.into()).await?;
    println!(
        "{}",
        json!({
            "run_id": outcome.run_id,
            "session_id": outcome.session_id,
            "exit_code": outcome.exit_code,
            "error": outcome.error,
        })
    );

    if outcome.exit_code != 0 {
        return Err(ExitError::new(
            1,
            format!("agent exited with code {}", outcome.exit_code),
        ));
    }
    Ok(())
}
