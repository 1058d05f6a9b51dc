use async_graphql::ErrorExtensions;
use thiserror::Error;
use tracing::error;

use crate::auth::{PasswordError, TokenError};
use crate::database::StorageError;

/// Failures returned by the account, project and task operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("User is already registered")]
    DuplicateIdentity,

    #[error("User does not exist")]
    UnknownIdentity,

    #[error("Incorrect password")]
    InvalidCredential,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Not allowed to modify this {}", .0.to_lowercase())]
    Forbidden(&'static str),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable machine-readable code, exposed to clients as `extensions.code`.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::DuplicateIdentity => "DUPLICATE_IDENTITY",
            ServiceError::UnknownIdentity => "UNKNOWN_IDENTITY",
            ServiceError::InvalidCredential => "INVALID_CREDENTIAL",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::Unauthorized => "UNAUTHORIZED",
            ServiceError::InvalidToken => "INVALID_TOKEN",
            ServiceError::ExpiredToken => "EXPIRED_TOKEN",
            ServiceError::Storage(_) => "STORAGE_ERROR",
            ServiceError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Client-safe message. Storage and internal details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            ServiceError::Storage(_) => "Storage error occurred".to_string(),
            ServiceError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ServiceError::ExpiredToken,
            TokenError::Invalid(_) => ServiceError::InvalidToken,
            TokenError::InvalidSecret | TokenError::InvalidTtl | TokenError::TokenGeneration(_) => {
                ServiceError::Internal(err.to_string())
            }
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl ErrorExtensions for ServiceError {
    fn extend(&self) -> async_graphql::Error {
        match self {
            ServiceError::Storage(e) => error!("Storage error: {}", e),
            ServiceError::Internal(msg) => error!("Internal error: {}", msg),
            _ => {}
        }

        let code = self.code();
        async_graphql::Error::new(self.client_message()).extend_with(|_, e| e.set("code", code))
    }
}
