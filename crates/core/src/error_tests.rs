// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::*;

#[test]
fn serializes_with_error_tag() {
    let err = ToolError::not_found("task 'x' not found");
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["message"], "task 'x' not found");
}

#[yare::parameterized(
    not_found          = { ToolErrorKind::NotFound, "not_found" },
    invalid_input      = { ToolErrorKind::InvalidInput, "invalid_input" },
    invalid_transition = { ToolErrorKind::InvalidTransition, "invalid_transition" },
    invalid_role       = { ToolErrorKind::InvalidRole, "invalid_role" },
)]
fn kind_display(kind: ToolErrorKind, expected: &str) {
    assert_eq!(kind.to_string(), expected);
}

#[test]
fn transition_error_maps_to_invalid_transition() {
    let err: ToolError = TransitionError::SameStep {
        step_name: "Plan".to_string(),
    }
    .into();
    assert_eq!(err.kind, ToolErrorKind::InvalidTransition);
    assert!(err.message.contains("Plan"));
}
