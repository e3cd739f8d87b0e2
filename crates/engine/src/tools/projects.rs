// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Project operations.

use super::{emit, require_project, ToolSurface};
use crate::error::OpError;
use crate::git;
use fm_core::{
    Clock, EventPayload, Project, ProjectId, ProjectStatus, StepDef, StepId, ToolError,
    WorkflowStep,
};
use fm_store::{projects, steps};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub repo_path: Option<PathBuf>,
    pub base_branch: Option<String>,
}

impl<C: Clock> ToolSurface<C> {
    /// Create a project. When `repo_path` is given it must be a git working
    /// tree; the default branch is detected when `base_branch` is absent.
    pub async fn create_project(&mut self, input: CreateProject) -> Result<Project, OpError> {
        let mut base_branch = input.base_branch;
        if let Some(repo) = &input.repo_path {
            if !git::is_git_repo(repo).await {
                return Err(ToolError::invalid_input(format!(
                    "repo_path '{}' is not a git working tree",
                    repo.display()
                ))
                .into());
            }
            if base_branch.is_none() {
                base_branch = Some(git::detect_default_branch(repo).await);
            }
        }

        let now = self.now();
        let project = Project {
            id: ProjectId::new(),
            title: input.title,
            description: input.description,
            repo_path: input.repo_path,
            base_branch,
            status: ProjectStatus::Active,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let default_workflow = self.default_workflow().map(|defs| defs.to_vec());
        let tx = self.db_mut().transaction()?;
        projects::insert(&tx, &project)?;
        emit(
            &tx,
            &EventPayload::ProjectCreated {
                project_id: project.id.clone(),
            },
            &now,
        )?;
        // Projects created without explicit steps start on the configured
        // default workflow.
        if let Some(step_defs) = default_workflow {
            for (position, def) in step_defs.iter().enumerate() {
                steps::insert(
                    &tx,
                    &WorkflowStep {
                        id: StepId::new(),
                        project_id: project.id.clone(),
                        name: def.name.clone(),
                        position: position as i64,
                        system_prompt: def.system_prompt.clone(),
                        model: def.model.clone(),
                        color: def.color.clone(),
                        created_at: now.clone(),
                    },
                )?;
            }
        }
        tx.commit()?;
        Ok(project)
    }

    /// Append workflow steps to a project from an ordered list of
    /// definitions. Rejects an empty list and blank names.
    pub fn create_workflow_steps(
        &mut self,
        project_id: &ProjectId,
        step_defs: &[StepDef],
    ) -> Result<Vec<WorkflowStep>, OpError> {
        if step_defs.is_empty() {
            return Err(ToolError::invalid_input("steps list must not be empty").into());
        }
        for def in step_defs {
            if def.name.trim().is_empty() {
                return Err(ToolError::invalid_input("every step needs a name").into());
            }
        }

        let now = self.now();
        let tx = self.db_mut().transaction()?;
        require_project(&tx, project_id)?;

        let existing = steps::list_for_project(&tx, project_id)?;
        let mut taken: Vec<&str> = existing.iter().map(|s| s.name.as_str()).collect();
        for def in step_defs {
            if taken.contains(&def.name.as_str()) {
                return Err(ToolError::invalid_input(format!(
                    "duplicate step name '{}'",
                    def.name
                ))
                .into());
            }
            taken.push(&def.name);
        }

        let start = steps::max_position(&tx, project_id)?.map_or(0, |max| max + 1);
        let mut created = Vec::with_capacity(step_defs.len());
        for (offset, def) in step_defs.iter().enumerate() {
            let step = WorkflowStep {
                id: StepId::new(),
                project_id: project_id.clone(),
                name: def.name.clone(),
                position: start + offset as i64,
                system_prompt: def.system_prompt.clone(),
                model: def.model.clone(),
                color: def.color.clone(),
                created_at: now.clone(),
            };
            steps::insert(&tx, &step)?;
            created.push(step);
        }
        tx.commit()?;
        Ok(created)
    }

    /// Cancel a project. Terminal: there is no un-cancel.
    pub fn cancel_project(&mut self, project_id: &ProjectId) -> Result<Project, OpError> {
        let now = self.now();
        let tx = self.db_mut().transaction()?;
        let project = require_project(&tx, project_id)?;
        if project.status == ProjectStatus::Cancelled {
            return Err(ToolError::invalid_transition(format!(
                "project '{project_id}' is already cancelled"
            ))
            .into());
        }
        projects::set_status(&tx, project_id, ProjectStatus::Cancelled, &now)?;
        emit(
            &tx,
            &EventPayload::ProjectCancelled {
                project_id: project_id.clone(),
            },
            &now,
        )?;
        tx.commit()?;
        Ok(Project {
            status: ProjectStatus::Cancelled,
            updated_at: now,
            ..project
        })
    }
}
