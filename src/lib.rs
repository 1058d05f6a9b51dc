pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod services;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::{TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::DocumentStore;
use crate::graphql::{build_schema, ApiSchema};
use crate::middleware::auth_context_middleware;
use crate::services::Services;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub schema: ApiSchema,
    pub store: Arc<dyn DocumentStore>,
    pub tokens: Arc<TokenService>,
    pub graphiql: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn DocumentStore>) -> Result<Self, TokenError> {
        let tokens = Arc::new(TokenService::from_config(&config.security)?);
        let schema = build_schema(Services::new(Arc::clone(&store), Arc::clone(&tokens)));

        Ok(Self {
            schema,
            store,
            tokens,
            graphiql: config.api.enable_graphiql,
        })
    }
}

/// Build the HTTP application: routes plus the global middleware stack.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // GraphQL (identity enforced per operation)
        .route("/graphql", get(handlers::graphiql).post(handlers::graphql_handler))
        .fallback(handlers::not_found)
        // Global middleware
        .layer(from_fn_with_state(Arc::clone(&state.tokens), auth_context_middleware))
        // GraphQLRequest reads the raw body, so the limit is enforced on the stream
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security.cors_origins));

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

/// Permissive when no origins are configured, otherwise limited to the listed origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
