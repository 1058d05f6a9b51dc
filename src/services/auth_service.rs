use std::sync::Arc;

use tracing::{debug, info, warn};

use super::ServiceError;
use crate::auth::{hash_password, verify_password, TokenService};
use crate::database::models::{Profile, User};
use crate::database::{DocumentStore, Filter, Repository, StorageError};

/// Acknowledgment returned by a successful registration.
pub const USER_REGISTERED: &str = "User created successfully";

/// Registration and login against the credential store.
#[derive(Clone)]
pub struct AuthService {
    users: Repository<User>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: Arc<TokenService>) -> Self {
        Self {
            users: Repository::new(store),
            tokens,
        }
    }

    /// Create an account. No token is issued; callers authenticate separately.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: Profile,
    ) -> Result<&'static str, ServiceError> {
        if self.find_by_email(email).await?.is_some() {
            warn!("Registration rejected, email already in use: {}", email);
            return Err(ServiceError::DuplicateIdentity);
        }

        let password = password.to_string();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ServiceError::Internal(format!("password hashing task failed: {e}")))??;

        let user = User::new(email, hash, profile);
        match self.users.insert(&user).await {
            Ok(()) => {}
            // Lost a race with a concurrent registration of the same email
            Err(StorageError::Duplicate { .. }) => {
                warn!("Registration rejected by unique email constraint: {}", email);
                return Err(ServiceError::DuplicateIdentity);
            }
            Err(e) => return Err(e.into()),
        }

        info!("Registered user {} <{}>", user.id, user.email);
        Ok(USER_REGISTERED)
    }

    /// Check credentials and issue a signed identity token.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, ServiceError> {
        let user = self.find_by_email(email).await?.ok_or_else(|| {
            debug!("Authentication failed, unknown email: {}", email);
            ServiceError::UnknownIdentity
        })?;

        let hash = user.password.clone();
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&hash, &password))
            .await
            .map_err(|e| ServiceError::Internal(format!("password check task failed: {e}")))?;
        if !matches {
            warn!("Authentication failed, wrong password for user {}", user.id);
            return Err(ServiceError::InvalidCredential);
        }

        let token = self.tokens.issue(&user)?;
        info!("Issued token for user {}", user.id);
        Ok(token)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let filter = Filter::new().eq("email", email);
        Ok(self.users.select_one(&filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryStore, USERS};
    use crate::testing::{FailingStore, TestContext};

    fn profile(name: &str) -> Profile {
        Profile { name: name.to_string() }
    }

    #[tokio::test]
    async fn distinct_emails_register_independently() {
        let ctx = TestContext::new();
        let auth = &ctx.services.auth;

        assert_eq!(auth.register("a@x.com", "pw1", profile("A")).await.unwrap(), USER_REGISTERED);
        assert_eq!(auth.register("b@x.com", "pw2", profile("B")).await.unwrap(), USER_REGISTERED);
        assert_eq!(ctx.store.len(USERS).await, 2);
    }

    #[tokio::test]
    async fn repeated_email_is_duplicate_identity() {
        let ctx = TestContext::new();
        let auth = &ctx.services.auth;

        auth.register("a@x.com", "pw1", profile("A")).await.unwrap();
        let err = auth.register("a@x.com", "pw2", profile("A2")).await.unwrap_err();

        assert!(matches!(err, ServiceError::DuplicateIdentity));
        assert_eq!(ctx.store.len(USERS).await, 1);
    }

    #[tokio::test]
    async fn password_is_stored_hashed() {
        let ctx = TestContext::new();
        ctx.services
            .auth
            .register("a@x.com", "plain-secret", profile("A"))
            .await
            .unwrap();

        let users: Repository<User> = Repository::new(ctx.store.clone());
        let stored = users
            .select_one(&Filter::new().eq("email", "a@x.com"))
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password, "plain-secret");
        assert!(verify_password(&stored.password, "plain-secret"));
        assert_eq!(stored.name, "A");
    }

    #[tokio::test]
    async fn authenticate_issues_token_with_identity() {
        let ctx = TestContext::new();
        let auth = &ctx.services.auth;
        auth.register("a@x.com", "pw1", profile("A")).await.unwrap();

        let token = auth.authenticate("a@x.com", "pw1").await.unwrap();
        let claims = ctx.tokens.verify(&token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.name, "A");
    }

    #[tokio::test]
    async fn unknown_email_fails() {
        let ctx = TestContext::new();
        let err = ctx.services.auth.authenticate("nobody@x.com", "pw").await.unwrap_err();
        assert!(matches!(err, ServiceError::UnknownIdentity));
    }

    #[tokio::test]
    async fn wrong_password_fails() {
        let ctx = TestContext::new();
        let auth = &ctx.services.auth;
        auth.register("a@x.com", "pw1", profile("A")).await.unwrap();

        let err = auth.authenticate("a@x.com", "pw2").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredential));
    }

    #[tokio::test]
    async fn concurrent_registrations_of_one_email_admit_one() {
        let ctx = TestContext::new();
        let auth = ctx.services.auth.clone();
        let other = ctx.services.auth.clone();

        let (first, second) = tokio::join!(
            auth.register("race@x.com", "pw1", profile("One")),
            other.register("race@x.com", "pw2", profile("Two")),
        );

        let successes = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1);
        assert!(matches!(
            first.err().or(second.err()),
            Some(ServiceError::DuplicateIdentity)
        ));
        assert_eq!(ctx.store.len(USERS).await, 1);
    }

    #[tokio::test]
    async fn register_works_on_a_bare_store() {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenService::new("secret", chrono::Duration::hours(4)).unwrap());
        let auth = AuthService::new(store.clone(), tokens);
        auth.register("solo@x.com", "pw", profile("Solo")).await.unwrap();
        assert_eq!(store.len(USERS).await, 1);
    }

    #[tokio::test]
    async fn register_propagates_storage_failure() {
        let services = FailingStore::services();

        let err = services
            .auth
            .register("lost@x.com", "pw", profile("Lost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert_eq!(err.client_message(), "Storage error occurred");
    }
}
