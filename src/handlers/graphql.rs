// handlers/graphql.rs - GET/POST /graphql

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html, Extension};

use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::AppState;

/// POST /graphql - execute a query or mutation with the request's caller context
pub async fn graphql_handler(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let auth = auth.map(|Extension(auth)| auth).unwrap_or_default();
    state
        .schema
        .execute(request.into_inner().data(auth))
        .await
        .into()
}

/// GET /graphql - interactive explorer, only when enabled in config
pub async fn graphiql(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    if !state.graphiql {
        return Err(ApiError::not_found("GraphiQL is disabled"));
    }
    Ok(Html(GraphiQLSource::build().endpoint("/graphql").finish()))
}
