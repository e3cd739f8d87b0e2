// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Trigger processor: the single scheduler loop that turns events into
//! dispatches, cleanups, and ready-promotions.
//!
//! One tick reads every unconsumed trigger event in creation order, gathers
//! the facts the pure policy needs, and enacts the returned action. Blocking
//! work (git, the agent subprocess) always runs in spawned tasks; the loop
//! itself only touches the store.

mod decision;

pub use decision::{decide, TaskFacts, TriggerAction};

use crate::context::EngineContext;
use crate::deps;
use crate::error::EngineError;
use crate::runner;
use crate::tools;
use crate::worktree::WorktreeCoordinator;
use fm_core::{Clock, EventPayload, StepId, SystemClock, TaskId};
use fm_store::{events, projects, steps, tasks, Db};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const TRIGGER_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct TriggerProcessor {
    ctx: EngineContext,
    db: Db,
}

impl TriggerProcessor {
    pub fn new(ctx: EngineContext) -> Result<Self, EngineError> {
        let db = ctx.open_db()?;
        Ok(Self { ctx, db })
    }

    /// Poll until cancelled. Tick failures are logged; the loop continues.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            if let Err(e) = self.tick().await {
                tracing::error!(error = %e, "trigger tick failed");
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(TRIGGER_POLL_INTERVAL) => {}
            }
        }
        tracing::debug!("trigger processor stopped");
    }

    /// One poll iteration, exposed for tests.
    pub async fn tick(&mut self) -> Result<(), EngineError> {
        let pending = events::unconsumed_for_trigger(self.db.conn())?;
        for event in pending {
            let facts = self.gather_facts(&event.payload)?;
            match decide(&event.payload, facts.as_ref()) {
                TriggerAction::Dispatch(task_id) => {
                    events::mark_trigger_consumed(self.db.conn(), &event.id)?;
                    self.spawn_runner(task_id);
                }
                TriggerAction::Cleanup(task_id) => {
                    events::mark_trigger_consumed(self.db.conn(), &event.id)?;
                    self.spawn_cleanup(task_id);
                }
                TriggerAction::Promote(task_id) => {
                    self.promote(&task_id)?;
                    events::mark_trigger_consumed(self.db.conn(), &event.id)?;
                }
                TriggerAction::Consume => {
                    events::mark_trigger_consumed(self.db.conn(), &event.id)?;
                }
                TriggerAction::Retry => {
                    // At capacity: leave unconsumed, re-examined next tick.
                }
            }
        }
        Ok(())
    }

    /// Resolve the task an event refers to into the policy's fact view.
    ///
    /// For `task_moved` the arrival step comes from the payload; everything
    /// else uses the task's current step.
    fn gather_facts(&self, payload: &EventPayload) -> Result<Option<TaskFacts>, EngineError> {
        let conn = self.db.conn();
        let Some(task_id) = payload.task_id() else {
            return Ok(None);
        };
        let Some(task) = tasks::get(conn, task_id)? else {
            return Ok(None);
        };

        let step_id: StepId = match payload {
            EventPayload::TaskMoved { new_step_id, .. } => new_step_id.clone(),
            _ => task.step_id.clone(),
        };
        let Some(step) = steps::get(conn, &step_id)? else {
            return Ok(None);
        };
        let terminal = steps::max_position(conn, &task.project_id)?;

        let gate = deps::dispatch_gate(conn, &task, self.ctx.config.max_parallel_agents)?;
        Ok(Some(TaskFacts {
            task_id: task.id.clone(),
            cancelled: task.cancelled,
            step_has_agent: step.has_agent(),
            step_is_terminal: Some(step.position) == terminal,
            has_worktree: task.worktree_path.is_some(),
            gate,
        }))
    }

    /// `task_ready`: move the task forward to the next agent step, if one
    /// exists past its current position. The resulting `task_moved` event
    /// drives the actual dispatch on a later tick.
    fn promote(&mut self, task_id: &TaskId) -> Result<(), EngineError> {
        let now = SystemClock.timestamp();
        let tx = self.db.transaction()?;
        let Some(task) = tasks::get(&tx, task_id)? else {
            return Ok(());
        };
        if task.cancelled {
            return Ok(());
        }
        let Some(current) = steps::get(&tx, &task.step_id)? else {
            return Ok(());
        };
        let Some(next) =
            steps::next_agent_step_after(&tx, &task.project_id, current.position)?
        else {
            return Ok(());
        };

        tasks::set_step(&tx, task_id, &next.id, &now)?;
        tools::emit_task_moved_forward(&tx, &task, &current, &next, &now)?;
        tx.commit()?;
        tracing::info!(task = %task_id, step = %next.name, "promoted ready task");
        Ok(())
    }

    /// Open the run row in this tick (so the capacity gate counts it
    /// immediately), then supervise the subprocess off-loop. This path only
    /// logs; direct callers get the error instead.
    fn spawn_runner(&self, task_id: TaskId) {
        let prepared = match runner::prepare_dispatch(&self.ctx, &task_id) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(task = %task_id, error = %e, "dispatch rejected");
                return;
            }
        };
        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            match runner::run_dispatch(&ctx, prepared).await {
                Ok(outcome) => tracing::info!(
                    task = %task_id,
                    exit_code = outcome.exit_code,
                    session = outcome.session_id.as_deref().unwrap_or(""),
                    "agent run finished"
                ),
                Err(e) => tracing::error!(task = %task_id, error = %e, "agent launch failed"),
            }
        });
    }

    fn spawn_cleanup(&self, task_id: TaskId) {
        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = cleanup_worktree(&ctx, &task_id).await {
                tracing::warn!(task = %task_id, error = %e, "worktree cleanup failed");
            }
        });
    }
}

/// Remove a task's worktree and clear its columns. Best-effort; failures are
/// the caller's to log.
pub async fn cleanup_worktree(ctx: &EngineContext, task_id: &TaskId) -> Result<(), EngineError> {
    let db = ctx.open_db()?;
    let Some(task) = tasks::get(db.conn(), task_id)? else {
        return Ok(());
    };
    let Some(worktree_path) = task.worktree_path.clone() else {
        return Ok(());
    };

    let project = projects::get(db.conn(), &task.project_id)?;
    let coordinator = coordinator_for(ctx, project.as_ref());
    if let Err(e) = coordinator.remove(&worktree_path).await {
        tracing::warn!(task = %task_id, error = %e, "worktree removal incomplete");
    }

    let now = SystemClock.timestamp();
    tasks::clear_worktree(db.conn(), task_id, &now)?;
    tracing::info!(task = %task_id, path = %worktree_path.display(), "cleaned up worktree");
    Ok(())
}

#[cfg(test)]
#[path = "../trigger_tests.rs"]
mod tests;

/// Build a coordinator honoring the project's repo/branch overrides.
pub fn coordinator_for(
    ctx: &EngineContext,
    project: Option<&fm_core::Project>,
) -> WorktreeCoordinator {
    let repo_path = project
        .and_then(|p| p.repo_path.clone())
        .unwrap_or_else(|| ctx.config.repo_path.clone());
    let base_branch = project
        .and_then(|p| p.base_branch.clone())
        .unwrap_or_else(|| ctx.config.base_branch.clone());
    WorktreeCoordinator::new(repo_path, base_branch, ctx.config.worktrees_path.clone())
}
