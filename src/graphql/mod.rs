//! GraphQL surface: schema construction and the helpers resolvers share.
//!
//! Every resolver is a thin dispatch onto [`Services`]. Protected resolvers
//! obtain the caller through [`caller`], which surfaces the request's token
//! rejection reason when there is no verified identity.

pub mod inputs;
pub mod mutation;
pub mod query;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema};

use crate::middleware::{AuthContext, AuthUser};
use crate::services::{ServiceError, Services};

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(services: Services) -> ApiSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}

/// The verified caller for a protected operation.
pub(crate) fn caller(ctx: &Context<'_>) -> async_graphql::Result<AuthUser> {
    ctx.data_opt::<AuthContext>()
        .unwrap_or(&AuthContext::Anonymous)
        .user()
        .cloned()
        .map_err(|e| e.extend())
}

pub(crate) fn services<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Services> {
    ctx.data::<Services>()
}

/// Convert a service failure into a GraphQL error carrying its `code` extension.
pub(crate) fn extend(err: ServiceError) -> async_graphql::Error {
    err.extend()
}
