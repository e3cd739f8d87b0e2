// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<fm_core::ConfigError> for ExitError {
    fn from(err: fm_core::ConfigError) -> Self {
        Self::new(2, err.to_string())
    }
}

impl From<fm_engine::EngineError> for ExitError {
    fn from(err: fm_engine::EngineError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl From<fm_engine::LaunchError> for ExitError {
    fn from(err: fm_engine::LaunchError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl From<fm_store::StoreError> for ExitError {
    fn from(err: fm_store::StoreError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl From<std::io::Error> for ExitError {
    fn from(err: std::io::Error) -> Self {
        Self::new(1, err.to_string())
    }
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
