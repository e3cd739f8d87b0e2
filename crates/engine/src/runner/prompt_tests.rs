// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::*;
use fm_core::{CommentId, ProjectId, StepId, TaskId, TaskType};

fn task() -> Task {
    Task {
        id: TaskId::from_string("task-1"),
        project_id: ProjectId::from_string("proj-1"),
        parent_task_id: Some(TaskId::from_string("parent-1")),
        title: "Add retries".to_string(),
        description: "Wrap the fetch in a backoff loop".to_string(),
        step_id: StepId::from_string("s1"),
        cancelled: false,
        task_type: TaskType::Task,
        plan_approved: false,
        output: None,
        worktree_path: Some("/wt/proj-1/task-1".into()),
        branch: Some("task-task-1-1700000000".to_string()),
        session_id: None,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

fn comment(role: &str, at: &str, content: &str) -> Comment {
    Comment {
        id: CommentId::new(),
        task_id: TaskId::from_string("task-1"),
        author_role: role.to_string(),
        content: content.to_string(),
        created_at: at.to_string(),
    }
}

#[test]
fn three_framed_sections() {
    let comments = vec![
        comment("human", "2026-01-01T01:00:00Z", "please add tests"),
        comment("reviewer", "2026-01-01T02:00:00Z", "looks good"),
    ];
    let prompt = build_prompt(&task(), "Implement", &comments, "You write code.");

    let sections: Vec<&str> = prompt.split("\n\n").collect();
    assert_eq!(sections.len(), 3);
    assert!(sections[0].starts_with("<system_prompt>\nYou write code."));
    assert!(sections[1].contains("Task ID: task-1"));
    assert!(sections[1].contains("Project ID: proj-1"));
    assert!(sections[1].contains("Parent Task ID: parent-1"));
    assert!(sections[1].contains("Title: Add retries"));
    assert!(sections[1].contains("Step: Implement"));
    assert!(sections[1].contains("Branch: task-task-1-1700000000"));
    assert!(sections[1].contains("Worktree: /wt/proj-1/task-1"));
    assert!(sections[2].contains("[human] 2026-01-01T01:00:00Z: please add tests"));
    assert!(sections[2].contains("[reviewer] 2026-01-01T02:00:00Z: looks good"));
}

#[test]
fn comments_block_is_omitted_when_thread_is_empty() {
    let prompt = build_prompt(&task(), "Implement", &[], "You write code.");
    assert!(!prompt.contains("<comments>"));
    assert!(prompt.ends_with("</issue>"));
}

#[test]
fn missing_optionals_render_empty() {
    let mut t = task();
    t.parent_task_id = None;
    t.branch = None;
    t.worktree_path = None;
    let prompt = build_prompt(&t, "Plan", &[], "sys");
    assert!(prompt.contains("Parent Task ID: \n"));
    assert!(prompt.contains("Branch: \n"));
    assert!(prompt.contains("Worktree: \n</issue>"));
}
