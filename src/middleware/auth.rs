use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{Claims, TokenError, TokenService};
use crate::services::ServiceError;

/// Authenticated caller identity extracted from a verified token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Why a presented token was not accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenRejection {
    Invalid,
    Expired,
}

/// Caller identity attached to every request before any operation runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthContext {
    /// No `Authorization` header was sent.
    #[default]
    Anonymous,
    Authenticated(AuthUser),
    /// A token was sent but failed verification.
    Rejected(TokenRejection),
}

impl AuthContext {
    /// The verified caller, or the reason there is none.
    pub fn user(&self) -> Result<&AuthUser, ServiceError> {
        match self {
            AuthContext::Authenticated(user) => Ok(user),
            AuthContext::Anonymous => Err(ServiceError::Unauthorized),
            AuthContext::Rejected(TokenRejection::Invalid) => Err(ServiceError::InvalidToken),
            AuthContext::Rejected(TokenRejection::Expired) => Err(ServiceError::ExpiredToken),
        }
    }

    /// Resolve the context for a request from its headers.
    pub fn from_headers(headers: &HeaderMap, tokens: &TokenService) -> Self {
        let token = match extract_bearer_token(headers) {
            None => return AuthContext::Anonymous,
            Some(Err(msg)) => {
                warn!("Rejected Authorization header: {}", msg);
                return AuthContext::Rejected(TokenRejection::Invalid);
            }
            Some(Ok(token)) => token,
        };

        match tokens.verify(token) {
            Ok(claims) => {
                debug!("Authenticated request for user {}", claims.id);
                AuthContext::Authenticated(claims.into())
            }
            Err(TokenError::Expired) => {
                debug!("Rejected expired token");
                AuthContext::Rejected(TokenRejection::Expired)
            }
            Err(e) => {
                warn!("Rejected token: {}", e);
                AuthContext::Rejected(TokenRejection::Invalid)
            }
        }
    }
}

/// Request context middleware: verifies any bearer token and injects an [`AuthContext`].
///
/// Requests are never rejected here. Public operations run regardless, and
/// protected operations report the stored rejection reason.
pub async fn auth_context_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = AuthContext::from_headers(request.headers(), &tokens);
    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Extract the bearer token from the Authorization header.
///
/// `None` when the header is absent, `Some(Err)` when it is present but unusable.
fn extract_bearer_token(headers: &HeaderMap) -> Option<Result<&str, &'static str>> {
    let auth_header = headers.get(AUTHORIZATION)?;

    let Ok(auth_str) = auth_header.to_str() else {
        return Some(Err("Invalid Authorization header format"));
    };

    Some(match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err("Empty JWT token"),
        Some(token) => Ok(token.trim()),
        None => Err("Authorization header must use Bearer token format"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Profile, User};
    use axum::http::HeaderValue;
    use chrono::Duration;

    fn tokens() -> TokenService {
        TokenService::new("middleware-secret", Duration::hours(4)).unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_anonymous() {
        let context = AuthContext::from_headers(&HeaderMap::new(), &tokens());
        assert_eq!(context, AuthContext::Anonymous);
        assert!(matches!(context.user(), Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn valid_token_yields_caller() {
        let tokens = tokens();
        let user = User::new("ada@example.com", String::new(), Profile { name: "Ada".into() });
        let token = tokens.issue(&user).unwrap();

        let context = AuthContext::from_headers(&headers(&format!("Bearer {token}")), &tokens);
        let caller = context.user().unwrap();
        assert_eq!(caller.id, user.id);
        assert_eq!(caller.email, "ada@example.com");
        assert_eq!(caller.name, "Ada");
    }

    #[test]
    fn bad_tokens_are_rejected_as_invalid() {
        let tokens = tokens();
        for value in ["Bearer nonsense", "Bearer   ", "Basic dXNlcjpwYXNz"] {
            let context = AuthContext::from_headers(&headers(value), &tokens);
            assert_eq!(context, AuthContext::Rejected(TokenRejection::Invalid), "{value}");
            assert!(matches!(context.user(), Err(ServiceError::InvalidToken)));
        }
    }

    #[test]
    fn expired_rejection_reports_expired_token() {
        let context = AuthContext::Rejected(TokenRejection::Expired);
        assert!(matches!(context.user(), Err(ServiceError::ExpiredToken)));
    }
}
