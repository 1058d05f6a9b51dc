use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::ownership::load_owned;
use super::ServiceError;
use crate::database::models::{NewTask, Owned, Task, TaskChanges};
use crate::database::{DocumentStore, Filter, Repository};
use crate::middleware::AuthUser;

/// Confirmation returned by a successful task deletion.
pub const TASK_DELETED: &str = "Task deleted";

#[derive(Clone)]
pub struct TaskService {
    tasks: Repository<Task>,
}

impl TaskService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            tasks: Repository::new(store),
        }
    }

    /// Tasks created by `caller` within `project`.
    pub async fn list(&self, caller: &AuthUser, project: Uuid) -> Result<Vec<Task>, ServiceError> {
        let filter = Filter::new()
            .eq_id("creator", caller.id)
            .eq_id("project", project);
        let tasks = self.tasks.select_any(&filter).await?;
        debug!(
            "Listed {} task(s) in project {} for user {}",
            tasks.len(),
            project,
            caller.id
        );
        Ok(tasks)
    }

    pub async fn create(&self, input: NewTask, caller: &AuthUser) -> Result<Task, ServiceError> {
        let task = Task::new(input, caller.id);
        self.tasks.insert(&task).await?;
        info!("Created task {} in project {}", task.id, task.project);
        Ok(task)
    }

    /// Merge `changes` into the task. `status` always overrides any status in `changes`.
    pub async fn update(
        &self,
        id: Uuid,
        mut changes: TaskChanges,
        status: bool,
        caller: &AuthUser,
    ) -> Result<Task, ServiceError> {
        load_owned(&self.tasks, id, caller).await?;
        changes.status = Some(status);
        let task = self
            .tasks
            .update_id(id, &changes)
            .await?
            .ok_or(ServiceError::NotFound(Task::KIND))?;
        info!("Updated task {} (status={})", id, task.status);
        Ok(task)
    }

    pub async fn delete(&self, id: Uuid, caller: &AuthUser) -> Result<&'static str, ServiceError> {
        load_owned(&self.tasks, id, caller).await?;
        if !self.tasks.delete_id(id).await? {
            return Err(ServiceError::NotFound(Task::KIND));
        }
        info!("Deleted task {}", id);
        Ok(TASK_DELETED)
    }
}
