pub mod auth_service;
pub mod error;
pub mod ownership;
pub mod project_service;
pub mod task_service;

use std::sync::Arc;

use crate::auth::TokenService;
use crate::database::DocumentStore;

pub use auth_service::{AuthService, USER_REGISTERED};
pub use error::ServiceError;
pub use ownership::{ensure_creator, load_owned};
pub use project_service::{ProjectService, PROJECT_DELETED};
pub use task_service::{TaskService, TASK_DELETED};

/// Every operation the API surface dispatches to, sharing one store.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub projects: ProjectService,
    pub tasks: TaskService,
}

impl Services {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: Arc<TokenService>) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&store), tokens),
            projects: ProjectService::new(Arc::clone(&store)),
            tasks: TaskService::new(store),
        }
    }
}
