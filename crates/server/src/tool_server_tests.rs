// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::*;
use fm_core::StepDef;
use fm_wire::encode;
use tempfile::TempDir;
use tokio::io::{AsyncWriteExt, BufReader};

struct Rig {
    server: ToolServer,
    _state: TempDir,
}

fn rig() -> Rig {
    let state = TempDir::new().unwrap();
    let db = Db::init(&state.path().join("foreman.db")).unwrap();
    Rig {
        server: ToolServer::new(db, None),
        _state: state,
    }
}

fn request(id: u64, call: ToolCall) -> Request {
    Request { id, call }
}

async fn seed_board(server: &mut ToolServer) -> (String, String) {
    let created = server
        .handle(request(
            1,
            ToolCall::CreateProject {
                title: "demo".to_string(),
                description: String::new(),
                repo_path: None,
                base_branch: None,
            },
        ))
        .await;
    let Response::Result { payload, .. } = created else {
        panic!("create_project failed: {created:?}");
    };
    let project_id = payload["id"].as_str().unwrap().to_string();

    let steps = server
        .handle(request(
            2,
            ToolCall::CreateWorkflowSteps {
                project_id: project_id.as_str().into(),
                steps: vec![
                    StepDef {
                        name: "Plan".to_string(),
                        system_prompt: Some("plan".to_string()),
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
            },
        ))
        .await;
    let Response::Result { payload, .. } = steps else {
        panic!("create_workflow_steps failed: {steps:?}");
    };
    let plan_step = payload[0]["id"].as_str().unwrap().to_string();
    (project_id, plan_step)
}

#[tokio::test]
async fn dispatches_mutations_and_reads() {
    let mut rig = rig();
    let (project_id, plan_step) = seed_board(&mut rig.server).await;

    let created = rig
        .server
        .handle(request(
            3,
            ToolCall::CreateTask {
                title: "build".to_string(),
                description: String::new(),
                step_id: plan_step.as_str().into(),
                project_id: project_id.as_str().into(),
                parent_task_id: None,
                task_type: fm_core::TaskType::Task,
            },
        ))
        .await;
    let Response::Result { id, payload } = created else {
        panic!("create_task failed: {created:?}");
    };
    assert_eq!(id, 3);
    let task_id = payload["id"].as_str().unwrap().to_string();

    let board = rig
        .server
        .handle(request(
            4,
            ToolCall::GetBoard {
                project_id: project_id.as_str().into(),
            },
        ))
        .await;
    let Response::Result { payload, .. } = board else {
        panic!("get_board failed: {board:?}");
    };
    assert_eq!(payload["columns"][0]["tasks"][0]["id"], task_id.as_str());
}

#[tokio::test]
async fn tool_rejections_become_tagged_error_frames() {
    let mut rig = rig();
    let response = rig
        .server
        .handle(request(
            9,
            ToolCall::GetTask {
                task_id: "missing".into(),
            },
        ))
        .await;
    match response {
        Response::Error { id, error, message } => {
            assert_eq!(id, 9);
            assert_eq!(error, "not_found");
            assert!(message.contains("missing"));
        }
        other => panic!("expected error frame, got {other:?}"),
    }
}

#[tokio::test]
async fn serves_a_full_session_over_a_stream() {
    let mut rig = rig();
    let (project_id, _) = seed_board(&mut rig.server).await;

    let mut input = String::new();
    input.push_str(&encode(&request(
        1,
        ToolCall::GetWorkflowSteps {
            project_id: project_id.as_str().into(),
        },
    ))
    .unwrap());
    input.push('\n');
    input.push_str("garbage line\n");
    input.push_str(&encode(&request(
        2,
        ToolCall::GetBoard {
            project_id: project_id.as_str().into(),
        },
    ))
    .unwrap());
    input.push('\n');

    let reader = BufReader::new(input.as_bytes());
    let mut out: Vec<u8> = Vec::new();
    rig.server.serve(reader, &mut out).await.unwrap();
    out.flush().await.unwrap();

    let text = String::from_utf8(out).unwrap();
    let frames: Vec<Response> = text
        .lines()
        .map(|line| fm_wire::decode(line).unwrap())
        .collect();
    assert_eq!(frames.len(), 3);
    assert!(matches!(frames[0], Response::Result { id: 1, .. }));
    // The garbage line got an invalid_input answer without closing the
    // session.
    assert!(
        matches!(&frames[1], Response::Error { error, .. } if error == "invalid_input")
    );
    assert!(matches!(frames[2], Response::Result { id: 2, .. }));
}
