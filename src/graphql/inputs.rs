use async_graphql::{InputObject, SimpleObject};
use uuid::Uuid;

use crate::database::models::{NewProject, NewTask, Profile, ProjectChanges, TaskChanges};

#[derive(Debug, InputObject)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn profile(&self) -> Profile {
        Profile {
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, InputObject)]
pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
}

/// Signed identity token returned by `authenticate`.
#[derive(Debug, SimpleObject)]
pub struct Token {
    pub token: String,
}

#[derive(Debug, InputObject)]
pub struct ProjectInput {
    pub name: String,
}

impl From<ProjectInput> for NewProject {
    fn from(input: ProjectInput) -> Self {
        NewProject { name: input.name }
    }
}

#[derive(Debug, Default, InputObject)]
pub struct ProjectUpdateInput {
    pub name: Option<String>,
}

impl From<ProjectUpdateInput> for ProjectChanges {
    fn from(input: ProjectUpdateInput) -> Self {
        ProjectChanges { name: input.name }
    }
}

#[derive(Debug, InputObject)]
pub struct ProjectRefInput {
    pub project: Uuid,
}

#[derive(Debug, InputObject)]
pub struct TaskInput {
    pub name: String,
    pub project: Uuid,
}

impl From<TaskInput> for NewTask {
    fn from(input: TaskInput) -> Self {
        NewTask {
            name: input.name,
            project: input.project,
        }
    }
}

/// Task fields a caller may change. Completion is set through the `status` argument.
#[derive(Debug, Default, InputObject)]
pub struct TaskUpdateInput {
    pub name: Option<String>,
    pub project: Option<Uuid>,
}

impl From<TaskUpdateInput> for TaskChanges {
    fn from(input: TaskUpdateInput) -> Self {
        TaskChanges {
            name: input.name,
            project: input.project,
            status: None,
        }
    }
}
