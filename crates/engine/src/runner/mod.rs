// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Agent runner: bounded supervision of one agent subprocess for one task.
//!
//! Coordinates worktree creation, prompt assembly, run recording, and the
//! subprocess itself. Three termination paths: normal exit (completion
//! recorded), exceptional exit (failure recorded), external cancellation
//! (subprocess terminated via the registry; the exit is recorded like any
//! other).

mod agent;
mod prompt;
mod registry;

pub use agent::{AgentInvocation, AgentOutput};
pub use prompt::build_prompt;
pub use registry::AgentRegistry;

use crate::context::EngineContext;
use crate::error::LaunchError;
use crate::trigger::coordinator_for;
use fm_core::{AgentRun, Clock, RunId, SystemClock, Task, TaskId, WorkflowStep};
use fm_store::{comments, projects, runs, steps, tasks, Db};

/// The recorded result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub session_id: Option<String>,
    pub exit_code: i64,
    pub error: Option<String>,
}

/// A dispatch whose run row is already open.
pub struct PreparedDispatch {
    db: Db,
    task: Task,
    step: WorkflowStep,
    run: AgentRun,
}

/// Validate the task and open its AgentRun row.
///
/// Runs are opened at dispatch, not when the subprocess comes up: the
/// trigger processor calls this synchronously inside its tick so the global
/// active-run count reflects the dispatch before the next event is
/// examined, which is what makes the capacity cap exact.
pub fn prepare_dispatch(
    ctx: &EngineContext,
    task_id: &TaskId,
) -> Result<PreparedDispatch, LaunchError> {
    let db = ctx.open_db()?;
    let (task, step) = load_dispatchable(&db, task_id)?;
    if runs::has_active(db.conn(), task_id)? {
        return Err(LaunchError::RunInProgress(task_id.clone()));
    }
    let run = AgentRun {
        id: RunId::new(),
        task_id: task_id.clone(),
        step_id: step.id.clone(),
        started_at: SystemClock.timestamp(),
        completed_at: None,
        exit_code: None,
        error: None,
    };
    runs::insert(db.conn(), &run)?;
    Ok(PreparedDispatch {
        db,
        task,
        step,
        run,
    })
}

/// Supervise a prepared dispatch to completion. Every path — normal exit,
/// exceptional exit, external termination — closes the run row.
pub async fn run_dispatch(
    ctx: &EngineContext,
    prepared: PreparedDispatch,
) -> Result<RunOutcome, LaunchError> {
    let PreparedDispatch {
        db,
        mut task,
        step,
        run,
    } = prepared;
    let clock = SystemClock;

    match supervise(ctx, &db, &mut task, &step, &run, &clock).await {
        Ok(output) => {
            let now = clock.timestamp();
            match &output.error {
                Some(error) => {
                    runs::complete_with_error(db.conn(), &run.id, output.exit_code, error, &now)?
                }
                None => runs::complete(db.conn(), &run.id, output.exit_code, &now)?,
            }
            Ok(RunOutcome {
                run_id: run.id,
                session_id: output.session_id,
                exit_code: output.exit_code,
                error: output.error,
            })
        }
        Err(e) => {
            let now = clock.timestamp();
            runs::fail(db.conn(), &run.id, &e.to_string(), &now)?;
            Err(e)
        }
    }
}

/// Launch an agent for a task and supervise it to completion. The one-shot
/// entry point for direct callers (`run-agent`).
pub async fn launch_agent(
    ctx: &EngineContext,
    task_id: &TaskId,
) -> Result<RunOutcome, LaunchError> {
    let prepared = prepare_dispatch(ctx, task_id)?;
    run_dispatch(ctx, prepared).await
}

async fn supervise(
    ctx: &EngineContext,
    db: &Db,
    task: &mut Task,
    step: &WorkflowStep,
    run: &AgentRun,
    clock: &SystemClock,
) -> Result<agent::AgentOutput, LaunchError> {
    let system_prompt = step
        .system_prompt
        .clone()
        .ok_or_else(|| LaunchError::NoAgent {
            step_name: step.name.clone(),
        })?;

    ensure_worktree(ctx, db, task, clock).await?;

    let model = step
        .model
        .clone()
        .unwrap_or_else(|| ctx.config.default_model.clone());
    let thread = comments::list_for_task(db.conn(), &task.id)?;
    let full_prompt = build_prompt(task, &step.name, &thread, &system_prompt);

    let invocation = AgentInvocation {
        run_id: run.id.clone(),
        task_id: task.id.clone(),
        program: ctx.config.agent_command.clone(),
        model,
        prompt: full_prompt,
        resume_session_id: task.session_id.clone(),
        worktree_path: task
            .worktree_path
            .clone()
            .unwrap_or_else(|| ctx.config.repo_path.clone()),
        db_path: ctx.config.db_path.clone(),
    };

    // Persist the session id the moment the handshake yields it; a crash
    // after this leaves the task resumable.
    let task_id = task.id.clone();
    let on_session_id = |sid: &str| {
        let now = clock.timestamp();
        if let Err(e) = tasks::set_session(db.conn(), &task_id, sid, &now) {
            tracing::error!(task = %task_id, error = %e, "failed to persist session id");
        }
    };

    agent::run_agent(invocation, &ctx.registry, on_session_id).await
}

/// Load the task and its step, rejecting cancelled tasks and agent-less
/// steps before any side effect happens.
fn load_dispatchable(db: &Db, task_id: &TaskId) -> Result<(Task, WorkflowStep), LaunchError> {
    let task = tasks::get(db.conn(), task_id)?
        .ok_or_else(|| LaunchError::TaskNotFound(task_id.clone()))?;
    if task.cancelled {
        return Err(LaunchError::TaskCancelled(task_id.clone()));
    }
    let step = steps::get(db.conn(), &task.step_id)?
        .ok_or_else(|| LaunchError::StepNotFound(task_id.clone()))?;
    if !step.has_agent() {
        return Err(LaunchError::NoAgent {
            step_name: step.name,
        });
    }
    Ok((task, step))
}

/// Create the task's worktree when absent and persist its path and branch.
async fn ensure_worktree(
    ctx: &EngineContext,
    db: &Db,
    task: &mut Task,
    clock: &SystemClock,
) -> Result<(), LaunchError> {
    if task.worktree_path.is_some() {
        return Ok(());
    }
    let project = projects::get(db.conn(), &task.project_id)?;
    let coordinator = coordinator_for(ctx, project.as_ref());
    let info = coordinator
        .create(&task.project_id, &task.id, clock.epoch_secs())
        .await?;

    let now = clock.timestamp();
    tasks::set_worktree(db.conn(), &task.id, &info.path, &info.branch, &now)?;
    task.worktree_path = Some(info.path);
    task.branch = Some(info.branch);
    task.updated_at = now;
    Ok(())
}

#[cfg(test)]
#[path = "../runner_tests.rs"]
mod tests;
