// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Stdio tool server.
//!
//! Speaks the NDJSON tool protocol on a reader/writer pair — in production
//! the stdin/stdout of `foreman mcp`, launched by the agent CLI from the
//! back-channel config the runner hands it. Optionally scoped to the task
//! the agent is working on (logging context only; every call names its own
//! entities and scoping never widens permissions).

use fm_core::TaskId;
use fm_engine::{OpError, ToolSurface};
use fm_store::Db;
use fm_wire::{read_request, write_response, ProtocolError, Request, Response, ToolCall};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncWrite};

pub struct ToolServer {
    surface: ToolSurface,
    scope_task: Option<TaskId>,
}

impl ToolServer {
    pub fn new(db: Db, scope_task: Option<TaskId>) -> Self {
        Self {
            surface: ToolSurface::new(db),
            scope_task,
        }
    }

    /// Seed the configured workflow into projects created without steps.
    pub fn with_default_workflow(mut self, steps: Vec<fm_core::StepDef>) -> Self {
        self.surface = self.surface.with_default_workflow(steps);
        self
    }

    /// Serve requests until the peer closes its end.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ProtocolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if let Some(task_id) = &self.scope_task {
            tracing::info!(task = %task_id, "tool server scoped to task");
        }
        loop {
            let request = match read_request(&mut reader).await {
                Ok(Some(request)) => request,
                Ok(None) => return Ok(()),
                Err(ProtocolError::Decode(message)) => {
                    // Answer the bad frame and keep the session alive.
                    let response = Response::Error {
                        id: 0,
                        error: "invalid_input".to_string(),
                        message,
                    };
                    write_response(&mut writer, &response).await?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let response = self.handle(request).await;
            write_response(&mut writer, &response).await?;
        }
    }

    /// Run one request to a response frame. Tool rejections and store
    /// failures both become error frames; nothing propagates.
    pub async fn handle(&mut self, request: Request) -> Response {
        let id = request.id;
        let tool = request.call.tool_name();
        match self.dispatch(request.call).await {
            Ok(payload) => Response::result(id, payload),
            Err(OpError::Tool(err)) => {
                tracing::debug!(tool, kind = %err.kind, "tool call rejected");
                Response::tool_error(id, &err)
            }
            Err(OpError::Store(err)) => {
                tracing::error!(tool, error = %err, "tool call failed");
                Response::internal_error(id, err.to_string())
            }
        }
    }

    async fn dispatch(&mut self, call: ToolCall) -> Result<Value, OpError> {
        let surface = &mut self.surface;
        match call {
            ToolCall::CreateProject {
                title,
                description,
                repo_path,
                base_branch,
            } => to_value(
                surface
                    .create_project(fm_engine::tools::CreateProject {
                        title,
                        description,
                        repo_path,
                        base_branch,
                    })
                    .await?,
            ),
            ToolCall::CancelProject { project_id } => {
                to_value(surface.cancel_project(&project_id)?)
            }
            ToolCall::CreateWorkflowSteps { project_id, steps } => {
                to_value(surface.create_workflow_steps(&project_id, &steps)?)
            }
            ToolCall::GetWorkflowSteps { project_id } => {
                to_value(surface.get_workflow_steps(&project_id)?)
            }
            ToolCall::GetBoard { project_id } => to_value(surface.get_board(&project_id)?),
            ToolCall::GetTask { task_id } => to_value(surface.get_task(&task_id)?),
            ToolCall::GetMyTasks {
                step_id,
                project_id,
            } => to_value(surface.get_my_tasks(&step_id, project_id.as_ref())?),
            ToolCall::GetValidSteps { task_id } => to_value(surface.get_valid_steps(&task_id)?),
            ToolCall::CreateTask {
                title,
                description,
                step_id,
                project_id,
                parent_task_id,
                task_type,
            } => to_value(surface.create_task(fm_engine::tools::CreateTask {
                title,
                description,
                step_id,
                project_id,
                parent_task_id,
                task_type,
            })?),
            ToolCall::CreateSubtasks {
                parent_task_id,
                tasks,
                default_step_id,
                dependencies,
                cascade_deps_from,
            } => to_value(surface.create_subtasks(
                &parent_task_id,
                &tasks,
                default_step_id.as_ref(),
                &dependencies,
                cascade_deps_from.as_ref(),
            )?),
            ToolCall::MoveTask {
                task_id,
                target_step_id,
            } => to_value(surface.move_task(&task_id, &target_step_id)?),
            ToolCall::CancelTask { task_id } => to_value(surface.cancel_task(&task_id)?),
            ToolCall::UncancelTask { task_id } => to_value(surface.uncancel_task(&task_id)?),
            ToolCall::AddComment {
                task_id,
                content,
                author_role,
            } => to_value(surface.add_comment(&task_id, &content, &author_role)?),
            ToolCall::AddDependency {
                predecessor_id,
                successor_id,
            } => to_value(surface.add_dependency(&predecessor_id, &successor_id)?),
            ToolCall::RemoveDependency { dependency_id } => {
                to_value(surface.remove_dependency(&dependency_id)?)
            }
            ToolCall::GetDependencies { task_id } => {
                to_value(surface.get_dependencies(&task_id)?)
            }
            ToolCall::ApprovePlan { task_id } => to_value(surface.approve_plan(&task_id)?),
            ToolCall::CompleteTask { task_id } => to_value(surface.complete_task(&task_id)?),
            ToolCall::SetTaskOutput { task_id, output } => {
                to_value(surface.set_task_output(&task_id, &output)?)
            }
        }
    }
}

fn to_value<T: serde::Serialize>(payload: T) -> Result<Value, OpError> {
    // Serialization of our own payload types does not fail.
    Ok(serde_json::to_value(payload).unwrap_or(Value::Null))
}

#[cfg(test)]
#[path = "tool_server_tests.rs"]
mod tests;
