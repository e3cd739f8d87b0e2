// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::*;
use crate::task::TaskType;

fn step(project: &str, name: &str, position: i64) -> WorkflowStep {
    WorkflowStep {
        id: StepId::from_string(format!("{project}-s{position}")),
        project_id: ProjectId::from_string(project),
        name: name.to_string(),
        position,
        system_prompt: None,
        model: None,
        color: None,
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

fn task_at(project: &str, position: i64) -> Task {
    Task {
        id: TaskId::from_string("t-1"),
        project_id: ProjectId::from_string(project),
        parent_task_id: None,
        title: "t".to_string(),
        description: String::new(),
        step_id: StepId::from_string(format!("{project}-s{position}")),
        cancelled: false,
        task_type: TaskType::Task,
        plan_approved: false,
        output: None,
        worktree_path: None,
        branch: None,
        session_id: None,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

#[test]
fn forward_by_one_is_allowed() {
    let t = task_at("p", 0);
    let got = validate_step_transition(&t, &step("p", "Plan", 0), &step("p", "Implement", 1))
        .unwrap();
    assert_eq!(got.direction, MoveDirection::Forward);
    assert_eq!(got.from_position, 0);
    assert_eq!(got.to_position, 1);
    assert_eq!(got.from_step_name, "Plan");
    assert_eq!(got.to_step_name, "Implement");
}

#[test]
fn forward_skip_is_rejected() {
    let t = task_at("p", 0);
    let err = validate_step_transition(&t, &step("p", "Plan", 0), &step("p", "Review", 2))
        .unwrap_err();
    match err {
        TransitionError::SkippedForward {
            from_position,
            to_position,
            next_position,
            ..
        } => {
            assert_eq!(from_position, 0);
            assert_eq!(to_position, 2);
            assert_eq!(next_position, 1);
        }
        other => panic!("expected SkippedForward, got {other:?}"),
    }
}

#[yare::parameterized(
    to_zero = { 3, 0 },
    to_one  = { 3, 1 },
    by_one  = { 2, 1 },
)]
fn backward_to_any_previous_step(from: i64, to: i64) {
    let t = task_at("p", from);
    let got =
        validate_step_transition(&t, &step("p", "From", from), &step("p", "To", to)).unwrap();
    assert_eq!(got.direction, MoveDirection::Backward);
    assert_eq!(got.to_position, to);
}

#[test]
fn same_step_is_rejected() {
    let t = task_at("p", 1);
    let err = validate_step_transition(&t, &step("p", "Implement", 1), &step("p", "Implement", 1))
        .unwrap_err();
    assert!(matches!(err, TransitionError::SameStep { step_name } if step_name == "Implement"));
}

#[test]
fn cross_project_is_rejected() {
    let t = task_at("p", 0);
    let err = validate_step_transition(&t, &step("p", "Plan", 0), &step("q", "Plan", 1))
        .unwrap_err();
    assert!(matches!(err, TransitionError::CrossProject { .. }));
}

#[test]
fn cancelled_task_cannot_move() {
    let mut t = task_at("p", 0);
    t.cancelled = true;
    let err = validate_step_transition(&t, &step("p", "Plan", 0), &step("p", "Implement", 1))
        .unwrap_err();
    assert!(matches!(err, TransitionError::TaskCancelled { .. }));
}

#[test]
fn cancel_round_trip() {
    let mut t = task_at("p", 0);
    validate_cancel(&t).unwrap();
    t.cancelled = true;
    assert!(matches!(
        validate_cancel(&t),
        Err(TransitionError::AlreadyCancelled { .. })
    ));
    validate_uncancel(&t).unwrap();
    t.cancelled = false;
    assert!(matches!(
        validate_uncancel(&t),
        Err(TransitionError::NotCancelled { .. })
    ));
}

#[test]
fn valid_targets_are_next_plus_previous() {
    let steps = vec![
        step("p", "Plan", 0),
        step("p", "Implement", 1),
        step("p", "Review", 2),
        step("p", "Done", 3),
    ];
    let t = task_at("p", 2);
    let targets: Vec<i64> = valid_target_steps(&t, &steps[2], &steps)
        .iter()
        .map(|s| s.position)
        .collect();
    assert_eq!(targets, vec![0, 1, 3]);
}

#[test]
fn valid_targets_empty_for_cancelled() {
    let steps = vec![step("p", "Plan", 0), step("p", "Done", 1)];
    let mut t = task_at("p", 0);
    t.cancelled = true;
    assert!(valid_target_steps(&t, &steps[0], &steps).is_empty());
}
