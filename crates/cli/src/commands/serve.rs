// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! `foreman serve`: run the schedulers until interrupted.

use crate::exit_error::ExitError;
use fm_engine::EngineContext;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), ExitError> {
    let config = super::load_config(config_path)?;
    let ctx = EngineContext::new(config);
    fm_server::serve(ctx).await?;
    Ok(())
}
