pub mod auth;
pub mod response;

pub use auth::{auth_context_middleware, AuthContext, AuthUser, TokenRejection};
pub use response::{ApiResponse, ApiResult};
