// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use fm_core::{
    BatchDependency, DependencyId, ProjectId, StepDef, StepId, SubtaskSpec, TaskId, TaskType,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One tool invocation from an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Caller-chosen correlation id, echoed on the response.
    pub id: u64,
    #[serde(flatten)]
    pub call: ToolCall,
}

/// Every operation of the tool surface, tagged by tool name.
///
/// Serializes as `{"tool": "move_task", "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "params", rename_all = "snake_case")]
pub enum ToolCall {
    CreateProject {
        title: String,
        #[serde(default)]
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        repo_path: Option<PathBuf>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_branch: Option<String>,
    },

    CancelProject {
        project_id: ProjectId,
    },

    CreateWorkflowSteps {
        project_id: ProjectId,
        steps: Vec<StepDef>,
    },

    GetWorkflowSteps {
        project_id: ProjectId,
    },

    GetBoard {
        project_id: ProjectId,
    },

    GetTask {
        task_id: TaskId,
    },

    GetMyTasks {
        step_id: StepId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        project_id: Option<ProjectId>,
    },

    GetValidSteps {
        task_id: TaskId,
    },

    CreateTask {
        title: String,
        #[serde(default)]
        description: String,
        step_id: StepId,
        project_id: ProjectId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_task_id: Option<TaskId>,
        #[serde(rename = "type", default)]
        task_type: TaskType,
    },

    CreateSubtasks {
        parent_task_id: TaskId,
        tasks: Vec<SubtaskSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_step_id: Option<StepId>,
        #[serde(default)]
        dependencies: Vec<BatchDependency>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cascade_deps_from: Option<TaskId>,
    },

    MoveTask {
        task_id: TaskId,
        target_step_id: StepId,
    },

    CancelTask {
        task_id: TaskId,
    },

    UncancelTask {
        task_id: TaskId,
    },

    AddComment {
        task_id: TaskId,
        content: String,
        author_role: String,
    },

    AddDependency {
        predecessor_id: TaskId,
        successor_id: TaskId,
    },

    RemoveDependency {
        dependency_id: DependencyId,
    },

    GetDependencies {
        task_id: TaskId,
    },

    ApprovePlan {
        task_id: TaskId,
    },

    CompleteTask {
        task_id: TaskId,
    },

    SetTaskOutput {
        task_id: TaskId,
        output: String,
    },
}

impl ToolCall {
    /// The wire tag, for logging.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::CreateProject { .. } => "create_project",
            Self::CancelProject { .. } => "cancel_project",
            Self::CreateWorkflowSteps { .. } => "create_workflow_steps",
            Self::GetWorkflowSteps { .. } => "get_workflow_steps",
            Self::GetBoard { .. } => "get_board",
            Self::GetTask { .. } => "get_task",
            Self::GetMyTasks { .. } => "get_my_tasks",
            Self::GetValidSteps { .. } => "get_valid_steps",
            Self::CreateTask { .. } => "create_task",
            Self::CreateSubtasks { .. } => "create_subtasks",
            Self::MoveTask { .. } => "move_task",
            Self::CancelTask { .. } => "cancel_task",
            Self::UncancelTask { .. } => "uncancel_task",
            Self::AddComment { .. } => "add_comment",
            Self::AddDependency { .. } => "add_dependency",
            Self::RemoveDependency { .. } => "remove_dependency",
            Self::GetDependencies { .. } => "get_dependencies",
            Self::ApprovePlan { .. } => "approve_plan",
            Self::CompleteTask { .. } => "complete_task",
            Self::SetTaskOutput { .. } => "set_task_output",
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
