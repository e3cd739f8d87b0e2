// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use fm_core::ToolError;
use serde::{Deserialize, Serialize};

/// Answer to one [`crate::Request`], echoing its correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// The operation's success payload.
    Result {
        id: u64,
        payload: serde_json::Value,
    },

    /// Tagged rejection or infrastructure failure. `error` carries the kind
    /// string (`not_found`, `invalid_input`, `invalid_transition`,
    /// `invalid_role`, or `internal`).
    Error {
        id: u64,
        error: String,
        message: String,
    },
}

impl Response {
    pub fn result(id: u64, payload: serde_json::Value) -> Self {
        Self::Result { id, payload }
    }

    pub fn tool_error(id: u64, err: &ToolError) -> Self {
        Self::Error {
            id,
            error: err.kind.to_string(),
            message: err.message.clone(),
        }
    }

    /// Infrastructure failure: maps to "other" at the HTTP boundary.
    pub fn internal_error(id: u64, message: impl Into<String>) -> Self {
        Self::Error {
            id,
            error: "internal".to_string(),
            message: message.into(),
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Result { id, .. } | Self::Error { id, .. } => *id,
        }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
