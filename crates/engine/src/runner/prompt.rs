// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Prompt assembly for agent runs.
//!
//! Three framed sections: the step's system prompt, the fixed issue fields,
//! and — when the thread is non-empty — the chronological comment log.

use fm_core::{Comment, Task};

pub fn build_prompt(
    task: &Task,
    step_name: &str,
    comments: &[Comment],
    system_prompt: &str,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);

    parts.push(format!("<system_prompt>\n{system_prompt}\n</system_prompt>"));

    let issue_lines = [
        format!("Task ID: {}", task.id),
        format!(
            "Project ID: {}",
            task.project_id
        ),
        format!(
            "Parent Task ID: {}",
            task.parent_task_id
                .as_ref()
                .map(|id| id.as_str())
                .unwrap_or("")
        ),
        format!("Title: {}", task.title),
        format!("Description: {}", task.description),
        format!("Step: {step_name}"),
        format!("Branch: {}", task.branch.as_deref().unwrap_or("")),
        format!(
            "Worktree: {}",
            task.worktree_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        ),
    ];
    parts.push(format!("<issue>\n{}\n</issue>", issue_lines.join("\n")));

    if !comments.is_empty() {
        let comment_lines: Vec<String> = comments
            .iter()
            .map(|c| format!("[{}] {}: {}", c.author_role, c.created_at, c.content))
            .collect();
        parts.push(format!(
            "<comments>\n{}\n</comments>",
            comment_lines.join("\n")
        ));
    }

    parts.join("\n\n")
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
