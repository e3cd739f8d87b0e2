// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::*;
use fm_core::TaskId;

#[test]
fn tool_tag_and_params_shape() {
    let request = Request {
        id: 7,
        call: ToolCall::MoveTask {
            task_id: TaskId::from_string("t-1"),
            target_step_id: StepId::from_string("s-1"),
        },
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["tool"], "move_task");
    assert_eq!(json["params"]["task_id"], "t-1");
    assert_eq!(json["params"]["target_step_id"], "s-1");
}

#[test]
fn defaults_fill_omitted_fields() {
    let request: Request = serde_json::from_str(
        r#"{"id":1,"tool":"create_task","params":{
            "title":"x","step_id":"s","project_id":"p"}}"#,
    )
    .unwrap();
    match request.call {
        ToolCall::CreateTask {
            description,
            parent_task_id,
            task_type,
            ..
        } => {
            assert_eq!(description, "");
            assert_eq!(parent_task_id, None);
            assert_eq!(task_type, TaskType::Task);
        }
        other => panic!("wrong call: {other:?}"),
    }
}

#[test]
fn subtasks_call_round_trips() {
    let request = Request {
        id: 2,
        call: ToolCall::CreateSubtasks {
            parent_task_id: TaskId::from_string("parent"),
            tasks: vec![SubtaskSpec {
                title: "child".to_string(),
                description: String::new(),
                step_id: None,
                task_type: TaskType::Research,
            }],
            default_step_id: Some(StepId::from_string("s-1")),
            dependencies: vec![BatchDependency {
                from_index: 0,
                to_index: 0,
            }],
            cascade_deps_from: None,
        },
    };
    let line = serde_json::to_string(&request).unwrap();
    let back: Request = serde_json::from_str(&line).unwrap();
    assert_eq!(back, request);
}

#[test]
fn unknown_tool_is_rejected() {
    let err = serde_json::from_str::<Request>(r#"{"id":1,"tool":"drop_tables","params":{}}"#);
    assert!(err.is_err());
}

#[yare::parameterized(
    get_board    = { r#"{"id":1,"tool":"get_board","params":{"project_id":"p"}}"#, "get_board" },
    approve_plan = { r#"{"id":1,"tool":"approve_plan","params":{"task_id":"t"}}"#, "approve_plan" },
    complete     = { r#"{"id":1,"tool":"complete_task","params":{"task_id":"t"}}"#, "complete_task" },
)]
fn tool_name_matches_tag(line: &str, expected: &str) {
    let request: Request = serde_json::from_str(line).unwrap();
    assert_eq!(request.call.tool_name(), expected);
}
