// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Round-trip properties over arbitrary request content.

use crate::{decode, encode, Request, Response, ToolCall};
use fm_core::{ProjectId, StepId, TaskId};
use proptest::prelude::*;

fn arb_call() -> impl Strategy<Value = ToolCall> {
    prop_oneof![
        any::<String>().prop_map(|title| ToolCall::CreateProject {
            title,
            description: String::new(),
            repo_path: None,
            base_branch: None,
        }),
        (any::<String>(), any::<String>()).prop_map(|(task_id, step_id)| {
            ToolCall::MoveTask {
                task_id: TaskId::from_string(task_id),
                target_step_id: StepId::from_string(step_id),
            }
        }),
        (any::<String>(), any::<String>(), any::<String>()).prop_map(
            |(task_id, content, author_role)| ToolCall::AddComment {
                task_id: TaskId::from_string(task_id),
                content,
                author_role,
            }
        ),
        any::<String>().prop_map(|project_id| ToolCall::GetBoard {
            project_id: ProjectId::from_string(project_id),
        }),
        (any::<String>(), any::<String>()).prop_map(|(task_id, output)| {
            ToolCall::SetTaskOutput {
                task_id: TaskId::from_string(task_id),
                output,
            }
        }),
    ]
}

proptest! {
    #[test]
    fn requests_round_trip(id in any::<u64>(), call in arb_call()) {
        let request = Request { id, call };
        let frame = encode(&request).unwrap();
        prop_assert!(!frame.contains('\n'));
        let back: Request = decode(&frame).unwrap();
        prop_assert_eq!(back, request);
    }

    #[test]
    fn error_responses_round_trip(id in any::<u64>(), kind in "[a-z_]{1,20}", message in ".*") {
        let response = Response::Error { id, error: kind, message };
        let back: Response = decode(&encode(&response).unwrap()).unwrap();
        prop_assert_eq!(back, response);
    }
}
