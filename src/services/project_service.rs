use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::ownership::load_owned;
use super::ServiceError;
use crate::database::models::{NewProject, Owned, Project, ProjectChanges};
use crate::database::{DocumentStore, Filter, Repository};
use crate::middleware::AuthUser;

/// Confirmation returned by a successful project deletion.
pub const PROJECT_DELETED: &str = "Project deleted";

#[derive(Clone)]
pub struct ProjectService {
    projects: Repository<Project>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            projects: Repository::new(store),
        }
    }

    /// Projects created by `caller`, in storage order.
    pub async fn list(&self, caller: &AuthUser) -> Result<Vec<Project>, ServiceError> {
        let filter = Filter::new().eq_id("creator", caller.id);
        let projects = self.projects.select_any(&filter).await?;
        debug!("Listed {} project(s) for user {}", projects.len(), caller.id);
        Ok(projects)
    }

    pub async fn create(&self, input: NewProject, caller: &AuthUser) -> Result<Project, ServiceError> {
        let project = Project::new(input, caller.id);
        self.projects.insert(&project).await?;
        info!("Created project {} for user {}", project.id, caller.id);
        Ok(project)
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: ProjectChanges,
        caller: &AuthUser,
    ) -> Result<Project, ServiceError> {
        load_owned(&self.projects, id, caller).await?;
        let project = self
            .projects
            .update_id(id, &changes)
            .await?
            .ok_or(ServiceError::NotFound(Project::KIND))?;
        info!("Updated project {}", id);
        Ok(project)
    }

    /// Remove the project. Its tasks are left in place.
    pub async fn delete(&self, id: Uuid, caller: &AuthUser) -> Result<&'static str, ServiceError> {
        load_owned(&self.projects, id, caller).await?;
        if !self.projects.delete_id(id).await? {
            return Err(ServiceError::NotFound(Project::KIND));
        }
        info!("Deleted project {}", id);
        Ok(PROJECT_DELETED)
    }
}
