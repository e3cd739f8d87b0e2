// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Agent run entity: one supervised subprocess execution for one task.

use crate::id::{RunId, StepId, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRun {
    pub id: RunId,
    pub task_id: TaskId,
    pub step_id: StepId,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentRun {
    /// A run is active until the subprocess terminates.
    pub fn is_active(&self) -> bool {
        self.completed_at.is_none()
    }
}
