use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use super::inputs::{
    AuthenticateInput, ProjectInput, ProjectUpdateInput, RegisterInput, TaskInput, Token,
    TaskUpdateInput,
};
use super::{caller, extend, services};
use crate::database::models::{Project, Task};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create an account. Returns an acknowledgment, not a token.
    async fn register(&self, ctx: &Context<'_>, input: RegisterInput) -> Result<String> {
        services(ctx)?
            .auth
            .register(&input.email, &input.password, input.profile())
            .await
            .map(str::to_string)
            .map_err(extend)
    }

    async fn authenticate(&self, ctx: &Context<'_>, input: AuthenticateInput) -> Result<Token> {
        let token = services(ctx)?
            .auth
            .authenticate(&input.email, &input.password)
            .await
            .map_err(extend)?;
        Ok(Token { token })
    }

    async fn create_project(&self, ctx: &Context<'_>, input: ProjectInput) -> Result<Project> {
        let caller = caller(ctx)?;
        services(ctx)?
            .projects
            .create(input.into(), &caller)
            .await
            .map_err(extend)
    }

    async fn update_project(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: ProjectUpdateInput,
    ) -> Result<Project> {
        let caller = caller(ctx)?;
        services(ctx)?
            .projects
            .update(id, input.into(), &caller)
            .await
            .map_err(extend)
    }

    async fn delete_project(&self, ctx: &Context<'_>, id: Uuid) -> Result<String> {
        let caller = caller(ctx)?;
        services(ctx)?
            .projects
            .delete(id, &caller)
            .await
            .map(str::to_string)
            .map_err(extend)
    }

    async fn create_task(&self, ctx: &Context<'_>, input: TaskInput) -> Result<Task> {
        let caller = caller(ctx)?;
        services(ctx)?
            .tasks
            .create(input.into(), &caller)
            .await
            .map_err(extend)
    }

    /// Merge `input` into the task and set its completion flag to `status`.
    async fn update_task(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: Option<TaskUpdateInput>,
        status: bool,
    ) -> Result<Task> {
        let caller = caller(ctx)?;
        services(ctx)?
            .tasks
            .update(id, input.unwrap_or_default().into(), status, &caller)
            .await
            .map_err(extend)
    }

    async fn delete_task(&self, ctx: &Context<'_>, id: Uuid) -> Result<String> {
        let caller = caller(ctx)?;
        services(ctx)?
            .tasks
            .delete(id, &caller)
            .await
            .map(str::to_string)
            .map_err(extend)
    }
}
