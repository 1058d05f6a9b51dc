pub mod filter;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod store;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::DatabaseConfig;

pub use filter::Filter;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{Document, Repository};
pub use store::{DocumentStore, Fields, StorageError};

/// Collection holding registered users.
pub const USERS: &str = "users";
/// Collection holding projects.
pub const PROJECTS: &str = "projects";
/// Collection holding tasks.
pub const TASKS: &str = "tasks";

/// Every collection the service persists.
pub const COLLECTIONS: &[&str] = &[USERS, PROJECTS, TASKS];

/// `(collection, field)` pairs whose values must be unique across the collection.
/// Both store implementations enforce these at insert time.
pub const UNIQUE_FIELDS: &[(&str, &str)] = &[(USERS, "email")];

/// Open the configured document store.
///
/// A configured `DATABASE_URL` selects PostgreSQL (tables are created on first
/// connect); otherwise documents live in process memory and are lost on exit.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>, StorageError> {
    match config.url.as_deref() {
        Some(url) => {
            let store = PgStore::connect(url, config).await?;
            store.migrate().await?;
            info!("Using PostgreSQL document store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
