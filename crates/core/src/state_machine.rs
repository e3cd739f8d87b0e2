// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Task step transition state machine.
//!
//! Movement rules:
//! - Forward: only to the next step (position + 1)
//! - Backward: to any previous step (position < current)
//! - Same step: rejected
//! - Cross-project: rejected
//! - Cancelled tasks cannot be moved
//!
//! Cancel/uncancel are orthogonal to step position. This module is pure
//! validation; callers load the rows and persist the results.

use crate::event::MoveDirection;
use crate::id::{ProjectId, StepId, TaskId};
use crate::step::WorkflowStep;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A validated step move, with both endpoints resolved for event payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTransition {
    pub task_id: TaskId,
    pub project_id: ProjectId,
    pub from_step_id: StepId,
    pub from_step_name: String,
    pub from_position: i64,
    pub to_step_id: StepId,
    pub to_step_name: String,
    pub to_position: i64,
    pub direction: MoveDirection,
}

/// Rejection from the state machine, carrying both the current and the
/// requested values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("task '{task_id}' is cancelled; uncancel it before moving")]
    TaskCancelled { task_id: TaskId },

    #[error("task is already at step '{step_name}'")]
    SameStep { step_name: String },

    #[error("target step '{target_step_name}' belongs to a different project")]
    CrossProject { target_step_name: String },

    #[error(
        "cannot skip steps: task is at '{from_step_name}' (position {from_position}), \
         target '{to_step_name}' is at position {to_position}; \
         only the next step (position {next_position}) is allowed"
    )]
    SkippedForward {
        from_step_name: String,
        from_position: i64,
        to_step_name: String,
        to_position: i64,
        next_position: i64,
    },

    #[error("task '{task_id}' is already cancelled")]
    AlreadyCancelled { task_id: TaskId },

    #[error("task '{task_id}' is not cancelled")]
    NotCancelled { task_id: TaskId },
}

/// Validate a step move for `task` from `current` to `target`.
///
/// Returns the resolved transition on success so callers can build the
/// `task_moved` payload without re-reading the steps.
pub fn validate_step_transition(
    task: &Task,
    current: &WorkflowStep,
    target: &WorkflowStep,
) -> Result<StepTransition, TransitionError> {
    if task.cancelled {
        return Err(TransitionError::TaskCancelled {
            task_id: task.id.clone(),
        });
    }

    if target.project_id != task.project_id {
        return Err(TransitionError::CrossProject {
            target_step_name: target.name.clone(),
        });
    }

    if target.position == current.position {
        return Err(TransitionError::SameStep {
            step_name: current.name.clone(),
        });
    }

    // Forward: only the next step is allowed. Backward: any previous step.
    let direction = if target.position > current.position {
        if target.position != current.position + 1 {
            return Err(TransitionError::SkippedForward {
                from_step_name: current.name.clone(),
                from_position: current.position,
                to_step_name: target.name.clone(),
                to_position: target.position,
                next_position: current.position + 1,
            });
        }
        MoveDirection::Forward
    } else {
        MoveDirection::Backward
    };

    Ok(StepTransition {
        task_id: task.id.clone(),
        project_id: task.project_id.clone(),
        from_step_id: current.id.clone(),
        from_step_name: current.name.clone(),
        from_position: current.position,
        to_step_id: target.id.clone(),
        to_step_name: target.name.clone(),
        to_position: target.position,
        direction,
    })
}

/// Validate setting the cancelled flag.
pub fn validate_cancel(task: &Task) -> Result<(), TransitionError> {
    if task.cancelled {
        return Err(TransitionError::AlreadyCancelled {
            task_id: task.id.clone(),
        });
    }
    Ok(())
}

/// Validate clearing the cancelled flag.
pub fn validate_uncancel(task: &Task) -> Result<(), TransitionError> {
    if !task.cancelled {
        return Err(TransitionError::NotCancelled {
            task_id: task.id.clone(),
        });
    }
    Ok(())
}

/// The steps a task may legally move to: the next step (if any) plus every
/// previous step. Empty for cancelled tasks.
pub fn valid_target_steps<'a>(
    task: &Task,
    current: &WorkflowStep,
    steps: &'a [WorkflowStep],
) -> Vec<&'a WorkflowStep> {
    if task.cancelled {
        return Vec::new();
    }
    steps
        .iter()
        .filter(|s| s.position == current.position + 1 || s.position < current.position)
        .collect()
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
