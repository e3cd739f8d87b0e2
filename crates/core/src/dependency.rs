// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Task dependency edge: successor is blocked until predecessor is done.

use crate::id::{DependencyId, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDependency {
    pub id: DependencyId,
    pub predecessor_id: TaskId,
    pub successor_id: TaskId,
    pub created_at: String,
}
