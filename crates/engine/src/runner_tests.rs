// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::agent::tests::stub_agent;
use super::*;
use crate::error::LaunchError;
use crate::worktree::tests::scratch_repo;
use fm_core::{Config, StepDef, StepId, TaskType};
use fm_store::Db;
use tempfile::TempDir;

struct Board {
    ctx: EngineContext,
    task_id: TaskId,
    plan_step: StepId,
    done_step: StepId,
    _dirs: (TempDir, TempDir),
}

/// File-backed board with a scratch repo and a stub agent script.
async fn board(agent_body: &str) -> Board {
    let repo = TempDir::new().unwrap();
    let state = TempDir::new().unwrap();
    let base_branch = scratch_repo(repo.path());
    let agent = stub_agent(state.path(), agent_body);

    let config = Config {
        repo_path: repo.path().to_path_buf(),
        base_branch,
        worktrees_path: state.path().join("worktrees"),
        db_path: state.path().join("foreman.db"),
        max_parallel_agents: 3,
        port_range: [4000, 4099],
        default_model: "claude-sonnet-4-5".to_string(),
        default_workflow: None,
        agent_command: agent.display().to_string(),
    };
    let ctx = EngineContext::new(config);

    let db = Db::init(&ctx.config.db_path).unwrap();
    let mut surface = crate::tools::ToolSurface::new(db);
    let project = surface
        .create_project(crate::tools::CreateProject {
            title: "demo".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let steps = surface
        .create_workflow_steps(
            &project.id,
            &[
                StepDef {
                    name: "Plan".to_string(),
                    system_prompt: Some("You plan.".to_string()),
                    model: None,
                    color: None,
                },
                StepDef {
                    name: "Done".to_string(),
                    system_prompt: None,
                    model: None,
                    color: None,
                },
            ],
        )
        .unwrap();
    let task = surface
        .create_task(crate::tools::CreateTask {
            title: "build".to_string(),
            description: String::new(),
            step_id: steps[0].id.clone(),
            project_id: project.id.clone(),
            parent_task_id: None,
            task_type: TaskType::Task,
        })
        .unwrap();

    Board {
        ctx,
        task_id: task.id,
        plan_step: steps[0].id.clone(),
        done_step: steps[1].id.clone(),
        _dirs: (repo, state),
    }
}

fn reload(ctx: &EngineContext, task_id: &TaskId) -> fm_core::Task {
    let db = ctx.open_db().unwrap();
    fm_store::tasks::get(db.conn(), task_id).unwrap().unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn happy_path_records_session_worktree_and_run() {
    let board = board(
        r#"echo '{"type":"system","subtype":"init","session_id":"sess-e2e"}'
echo '{"type":"result","subtype":"success"}'"#,
    )
    .await;

    let outcome = launch_agent(&board.ctx, &board.task_id).await.unwrap();
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.session_id.as_deref(), Some("sess-e2e"));

    let task = reload(&board.ctx, &board.task_id);
    assert_eq!(task.session_id.as_deref(), Some("sess-e2e"));
    let worktree = task.worktree_path.expect("worktree recorded");
    assert!(crate::worktree::worktree_exists(&worktree));
    assert!(task.branch.unwrap().starts_with("task-"));

    let db = board.ctx.open_db().unwrap();
    let runs = fm_store::runs::list_for_task(db.conn(), &board.task_id).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].exit_code, Some(0));
    assert!(!runs[0].is_active());
    assert_eq!(runs[0].step_id, board.plan_step);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_agent_closes_the_run_with_stderr() {
    let board = board(
        r#"echo '{"type":"system","subtype":"init","session_id":"sess-fail"}'
echo "out of tokens" >&2
exit 3"#,
    )
    .await;

    let outcome = launch_agent(&board.ctx, &board.task_id).await.unwrap();
    assert_eq!(outcome.exit_code, 3);
    assert_eq!(outcome.error.as_deref(), Some("out of tokens"));

    let db = board.ctx.open_db().unwrap();
    let runs = fm_store::runs::list_for_task(db.conn(), &board.task_id).unwrap();
    assert_eq!(runs[0].exit_code, Some(3));
    assert_eq!(runs[0].error.as_deref(), Some("out of tokens"));
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_tasks_are_rejected_before_side_effects() {
    let board = board("exit 0").await;
    {
        let db = board.ctx.open_db().unwrap();
        let mut surface = crate::tools::ToolSurface::new(db);
        surface.cancel_task(&board.task_id).unwrap();
    }

    let err = launch_agent(&board.ctx, &board.task_id).await.unwrap_err();
    assert!(matches!(err, LaunchError::TaskCancelled(_)));

    let task = reload(&board.ctx, &board.task_id);
    assert!(task.worktree_path.is_none());
    let db = board.ctx.open_db().unwrap();
    assert!(fm_store::runs::list_for_task(db.conn(), &board.task_id)
        .unwrap()
        .is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn a_second_concurrent_run_is_rejected() {
    let board = board("exit 0").await;
    {
        let db = board.ctx.open_db().unwrap();
        fm_store::runs::insert(
            db.conn(),
            &fm_core::AgentRun {
                id: fm_core::RunId::new(),
                task_id: board.task_id.clone(),
                step_id: board.plan_step.clone(),
                started_at: "2026-01-01T00:00:00Z".to_string(),
                completed_at: None,
                exit_code: None,
                error: None,
            },
        )
        .unwrap();
    }

    let err = launch_agent(&board.ctx, &board.task_id).await.unwrap_err();
    assert!(matches!(err, LaunchError::RunInProgress(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn agentless_steps_are_rejected() {
    let board = board("exit 0").await;
    {
        let db = board.ctx.open_db().unwrap();
        let mut surface = crate::tools::ToolSurface::new(db);
        // Walk the task to the agent-less terminal step.
        surface.complete_task(&board.task_id).unwrap();
    }
    let task = reload(&board.ctx, &board.task_id);
    assert_eq!(task.step_id, board.done_step);

    let err = launch_agent(&board.ctx, &board.task_id).await.unwrap_err();
    assert!(matches!(err, LaunchError::NoAgent { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn resume_passes_the_existing_session() {
    let board = board(
        r#"echo '{"type":"system","subtype":"init","session_id":"sess-fresh"}'"#,
    )
    .await;
    {
        let db = board.ctx.open_db().unwrap();
        fm_store::tasks::set_session(
            db.conn(),
            &board.task_id,
            "sess-existing",
            "2026-01-01T00:00:00Z",
        )
        .unwrap();
    }

    let outcome = launch_agent(&board.ctx, &board.task_id).await.unwrap();
    // The handshake's new id is ignored; the run resumed the stored session.
    assert_eq!(outcome.session_id.as_deref(), Some("sess-existing"));
    assert_eq!(
        reload(&board.ctx, &board.task_id).session_id.as_deref(),
        Some("sess-existing")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_agent_command_fails_the_run_row() {
    let board = board("exit 0").await;
    {
        // Swap the agent for a nonexistent binary.
        let mut config = (*board.ctx.config).clone();
        config.agent_command = "/nonexistent/agent-cli".to_string();
        let ctx = EngineContext::new(config);
        let err = launch_agent(&ctx, &board.task_id).await.unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));

        let db = ctx.open_db().unwrap();
        let runs = fm_store::runs::list_for_task(db.conn(), &board.task_id).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].exit_code, Some(-1));
        assert!(runs[0].error.as_deref().unwrap_or("").contains("could not be started"));
    }
}
