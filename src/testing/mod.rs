use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::auth::TokenService;
use crate::database::models::Profile;
use crate::database::{DocumentStore, Fields, Filter, MemoryStore, StorageError};
use crate::middleware::AuthUser;
use crate::services::Services;

/// Password given to every account created through [`TestContext::user`].
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Services wired to a fresh in-memory store, for unit tests.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<TokenService>,
    pub services: Services,
}

pub fn test_tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new("unit-test-secret", Duration::hours(4)).expect("non-empty secret"))
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let tokens = test_tokens();
        let services = Services::new(store.clone(), Arc::clone(&tokens));

        Self {
            store,
            tokens,
            services,
        }
    }

    /// Register `name` and sign in, returning the caller identity a request would carry.
    pub async fn user(&self, name: &str) -> AuthUser {
        let email = format!("{name}@example.test");
        self.services
            .auth
            .register(&email, TEST_PASSWORD, Profile { name: name.to_string() })
            .await
            .expect("register test user");

        let token = self
            .services
            .auth
            .authenticate(&email, TEST_PASSWORD)
            .await
            .expect("authenticate test user");
        let claims = self.tokens.verify(&token).expect("verify test token");
        AuthUser::from(claims)
    }
}

/// Store whose reads find nothing and whose writes and health check always fail.
pub struct FailingStore;

impl FailingStore {
    pub fn services() -> Services {
        Services::new(Arc::new(FailingStore), test_tokens())
    }
}

fn unavailable() -> StorageError {
    StorageError::Sqlx(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn find(&self, _collection: &str, _filter: &Filter) -> Result<Vec<Fields>, StorageError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _collection: &str, _id: Uuid) -> Result<Option<Fields>, StorageError> {
        Ok(None)
    }

    async fn insert(&self, _collection: &str, _id: Uuid, _body: Fields) -> Result<(), StorageError> {
        Err(unavailable())
    }

    async fn update_by_id(
        &self,
        _collection: &str,
        _id: Uuid,
        _changes: Fields,
    ) -> Result<Option<Fields>, StorageError> {
        Err(unavailable())
    }

    async fn delete_by_id(&self, _collection: &str, _id: Uuid) -> Result<bool, StorageError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Err(unavailable())
    }
}

/// A caller identity that was never registered.
pub fn stranger() -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: "stranger@example.test".to_string(),
        name: "Stranger".to_string(),
    }
}
