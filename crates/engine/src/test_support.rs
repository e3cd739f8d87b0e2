// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Shared fixtures for engine tests.

use crate::tools::{CreateProject, CreateTask, ToolSurface};
use fm_core::{FakeClock, Project, StepDef, StepId, Task, TaskId, TaskType, WorkflowStep};
use fm_store::Db;

pub(crate) struct Fixture {
    pub surface: ToolSurface<FakeClock>,
    pub clock: FakeClock,
    pub project: Project,
    /// Plan(agent), Implement(agent), Review(agent), Done.
    pub steps: Vec<WorkflowStep>,
}

impl Fixture {
    /// In-memory board with the canonical four-step workflow.
    pub async fn new() -> Self {
        Self::with_db(Db::open_in_memory().unwrap()).await
    }

    /// Same board seeded onto an existing (possibly file-backed) handle.
    pub async fn with_db(db: Db) -> Self {
        let clock = FakeClock::new();
        let mut surface = ToolSurface::with_clock(db, clock.clone());
        let project = surface
            .create_project(CreateProject {
                title: "demo".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let steps = surface
            .create_workflow_steps(
                &project.id,
                &[
                    agent_step("Plan"),
                    agent_step("Implement"),
                    agent_step("Review"),
                    StepDef {
                        name: "Done".to_string(),
                        system_prompt: None,
                        model: None,
                        color: None,
                    },
                ],
            )
            .unwrap();
        Self {
            surface,
            clock,
            project,
            steps,
        }
    }

    pub fn step(&self, name: &str) -> &WorkflowStep {
        self.steps
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("no step named {name}"))
    }

    pub fn step_id(&self, name: &str) -> StepId {
        self.step(name).id.clone()
    }

    pub fn task_at(&mut self, title: &str, step: &str) -> Task {
        let step_id = self.step_id(step);
        self.surface
            .create_task(CreateTask {
                title: title.to_string(),
                description: String::new(),
                step_id,
                project_id: self.project.id.clone(),
                parent_task_id: None,
                task_type: TaskType::Task,
            })
            .unwrap()
    }

    pub fn milestone_with_children(
        &mut self,
        title: &str,
        step: &str,
        child_titles: &[&str],
    ) -> (Task, Vec<Task>) {
        let step_id = self.step_id(step);
        let milestone = self
            .surface
            .create_task(CreateTask {
                title: title.to_string(),
                description: String::new(),
                step_id: step_id.clone(),
                project_id: self.project.id.clone(),
                parent_task_id: None,
                task_type: TaskType::Milestone,
            })
            .unwrap();
        let mut children = Vec::new();
        for child_title in child_titles {
            children.push(
                self.surface
                    .create_task(CreateTask {
                        title: child_title.to_string(),
                        description: String::new(),
                        step_id: step_id.clone(),
                        project_id: self.project.id.clone(),
                        parent_task_id: Some(milestone.id.clone()),
                        task_type: TaskType::Task,
                    })
                    .unwrap(),
            );
        }
        (milestone, children)
    }

    pub fn reload(&self, task_id: &TaskId) -> Task {
        fm_store::tasks::get(self.surface.db().conn(), task_id)
            .unwrap()
            .unwrap()
    }

    pub fn events_of_kind(&self, kind: &str) -> i64 {
        fm_store::events::count_of_kind(self.surface.db().conn(), kind).unwrap()
    }

    pub fn total_events(&self) -> usize {
        fm_store::events::list_all(self.surface.db().conn())
            .unwrap()
            .len()
    }
}

pub(crate) fn agent_step(name: &str) -> StepDef {
    StepDef {
        name: name.to_string(),
        system_prompt: Some(format!("You are the {name} agent.")),
        model: None,
        color: None,
    }
}
