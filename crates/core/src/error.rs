// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Tagged tool-surface errors.
//!
//! Every tool operation returns either a success payload or a
//! `{error: kind, message}` pair. The HTTP adapter maps kinds to status
//! codes; the wire protocol forwards them verbatim.

use crate::state_machine::TransitionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    NotFound,
    InvalidInput,
    InvalidTransition,
    InvalidRole,
}

impl fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("not_found"),
            Self::InvalidInput => f.write_str("invalid_input"),
            Self::InvalidTransition => f.write_str("invalid_transition"),
            Self::InvalidRole => f.write_str("invalid_role"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ToolError {
    #[serde(rename = "error")]
    pub kind: ToolErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ToolErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: ToolErrorKind::InvalidInput,
            message: message.into(),
        }
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self {
            kind: ToolErrorKind::InvalidTransition,
            message: message.into(),
        }
    }

    pub fn invalid_role(message: impl Into<String>) -> Self {
        Self {
            kind: ToolErrorKind::InvalidRole,
            message: message.into(),
        }
    }
}

impl From<TransitionError> for ToolError {
    fn from(err: TransitionError) -> Self {
        Self::invalid_transition(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
