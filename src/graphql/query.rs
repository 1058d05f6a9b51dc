use async_graphql::{Context, Object, Result};

use super::inputs::ProjectRefInput;
use super::{caller, extend, services};
use crate::database::models::{Project, Task};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Projects created by the caller.
    async fn list_projects(&self, ctx: &Context<'_>) -> Result<Vec<Project>> {
        let caller = caller(ctx)?;
        services(ctx)?.projects.list(&caller).await.map_err(extend)
    }

    /// Tasks the caller created within one project.
    async fn list_tasks(&self, ctx: &Context<'_>, input: ProjectRefInput) -> Result<Vec<Task>> {
        let caller = caller(ctx)?;
        services(ctx)?
            .tasks
            .list(&caller, input.project)
            .await
            .map_err(extend)
    }
}
