// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Comment entity. Append-only thread per task.

use crate::id::{CommentId, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    /// Free-form role label ("human", "planner", ...). Must be non-empty.
    pub author_role: String,
    pub content: String,
    pub created_at: String,
}
