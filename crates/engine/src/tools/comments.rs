// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Comment operations.

use super::{emit, require_task, ToolSurface};
use crate::error::OpError;
use fm_core::{Clock, Comment, CommentId, EventPayload, TaskId, ToolError};
use fm_store::comments;

impl<C: Clock> ToolSurface<C> {
    /// Append a comment to a task's thread. Any non-empty role is accepted.
    pub fn add_comment(
        &mut self,
        task_id: &TaskId,
        content: &str,
        author_role: &str,
    ) -> Result<Comment, OpError> {
        if author_role.trim().is_empty() {
            return Err(ToolError::invalid_role("author_role must be non-empty").into());
        }

        let now = self.now();
        let tx = self.db_mut().transaction()?;
        require_task(&tx, task_id)?;

        let comment = Comment {
            id: CommentId::new(),
            task_id: task_id.clone(),
            author_role: author_role.to_string(),
            content: content.to_string(),
            created_at: now.clone(),
        };
        comments::insert(&tx, &comment)?;
        emit(
            &tx,
            &EventPayload::CommentAdded {
                comment_id: comment.id.clone(),
                task_id: task_id.clone(),
            },
            &now,
        )?;
        tx.commit()?;
        Ok(comment)
    }
}
