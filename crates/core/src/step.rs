// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Workflow step entity.
//!
//! Steps form a dense ordered sequence per project: position 0 is where new
//! work enters, the largest position is the terminal "done" column. A step
//! with a `system_prompt` is an *agent step* — tasks arriving there are
//! dispatched to an agent subprocess.

use crate::id::{ProjectId, StepId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: StepId,
    pub project_id: ProjectId,
    pub name: String,
    pub position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: String,
}

impl WorkflowStep {
    /// An agent step dispatches a runner when a task arrives.
    pub fn has_agent(&self) -> bool {
        self.system_prompt.is_some()
    }
}
