use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use super::filter::Filter;

/// Body of a stored document: a JSON object keyed by field name.
pub type Fields = Map<String, Value>;

/// Errors raised by a document store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Duplicate value for unique field '{field}' in '{collection}'")]
    Duplicate { collection: String, field: String },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Malformed document in '{collection}': {reason}")]
    Malformed { collection: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence collaborator: a collection-oriented JSON document store.
///
/// Every operation is a single independent call; nothing here spans more than
/// one write. `update_by_id` merges the supplied top-level fields into the
/// stored body and leaves all other fields untouched.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents whose fields equal every condition in `filter`, in insertion order.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Fields>, StorageError>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Fields>, StorageError>;

    /// Fails with [`StorageError::Duplicate`] when a unique field collides.
    async fn insert(&self, collection: &str, id: Uuid, body: Fields) -> Result<(), StorageError>;

    /// Returns the merged document, or `None` when no document has this id.
    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        changes: Fields,
    ) -> Result<Option<Fields>, StorageError>;

    /// Returns whether a document was removed.
    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<bool, StorageError>;

    async fn health_check(&self) -> Result<(), StorageError>;
}

/// Unwrap a JSON value that must be an object.
pub(crate) fn into_fields(collection: &str, value: Value) -> Result<Fields, StorageError> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(StorageError::Malformed {
            collection: collection.to_string(),
            reason: format!("expected JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
