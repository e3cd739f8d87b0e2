// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

pub mod init;
pub mod mcp;
pub mod run_agent;
pub mod serve;

use crate::exit_error::ExitError;
use fm_core::Config;
use std::path::Path;

/// Load the config from an explicit path or `./foreman.config.json`.
pub(crate) fn load_config(config_path: Option<&Path>) -> Result<Config, ExitError> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?.join(init::CONFIG_FILE),
    };
    Ok(Config::load(&path)?)
}
