// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Pure dispatch policy.
//!
//! `decide` maps one trigger event plus a snapshot of facts about its task
//! to a single action. All I/O (fact gathering and enactment) lives in the
//! loop; this function is a table the tests can exercise directly.

use crate::deps::DispatchGate;
use fm_core::{EventPayload, TaskId};

/// What the trigger processor should do with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerAction {
    /// Consume the event and spawn a runner for the task.
    Dispatch(TaskId),
    /// Consume the event and schedule worktree removal off-loop.
    Cleanup(TaskId),
    /// Consume the event and move the task forward to its next agent step.
    Promote(TaskId),
    /// Consume the event; nothing to do.
    Consume,
    /// Leave the event unconsumed so it re-arrives next tick. Only used for
    /// global-capacity pressure.
    Retry,
}

/// Snapshot of everything the policy needs to know about the event's task.
#[derive(Debug, Clone)]
pub struct TaskFacts {
    pub task_id: TaskId,
    pub cancelled: bool,
    /// Whether the step the event put the task at carries an agent.
    pub step_has_agent: bool,
    /// Whether that step is the project's terminal position.
    pub step_is_terminal: bool,
    pub has_worktree: bool,
    pub gate: DispatchGate,
}

pub fn decide(event: &EventPayload, facts: Option<&TaskFacts>) -> TriggerAction {
    match event {
        EventPayload::TaskMoved { .. } | EventPayload::TaskCreated { .. } => {
            let Some(facts) = facts else {
                return TriggerAction::Consume;
            };
            if facts.cancelled {
                return cleanup_or_consume(facts);
            }
            if facts.step_has_agent {
                return gate_dispatch(facts);
            }
            if facts.step_is_terminal {
                return cleanup_or_consume(facts);
            }
            TriggerAction::Consume
        }

        EventPayload::TaskCancelled { .. } => match facts {
            Some(facts) => cleanup_or_consume(facts),
            None => TriggerAction::Consume,
        },

        EventPayload::TaskReady { .. } => match facts {
            Some(facts) if !facts.cancelled => TriggerAction::Promote(facts.task_id.clone()),
            _ => TriggerAction::Consume,
        },

        // Downstream effects of these were emitted synchronously by the tool
        // that ran; nothing left to enact here.
        EventPayload::PlanApproved { .. } | EventPayload::MilestoneCompleted { .. } => {
            TriggerAction::Consume
        }

        _ => TriggerAction::Consume,
    }
}

fn gate_dispatch(facts: &TaskFacts) -> TriggerAction {
    let gate = &facts.gate;
    if gate.has_active_run || !gate.parent_approved || gate.blocked {
        // Terminal for this event; a later event re-opens the question.
        return TriggerAction::Consume;
    }
    if gate.at_capacity {
        // Natural backpressure: the event re-arrives next tick.
        return TriggerAction::Retry;
    }
    TriggerAction::Dispatch(facts.task_id.clone())
}

fn cleanup_or_consume(facts: &TaskFacts) -> TriggerAction {
    if facts.has_worktree {
        TriggerAction::Cleanup(facts.task_id.clone())
    } else {
        TriggerAction::Consume
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
