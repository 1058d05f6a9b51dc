use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::filter::Filter;
use super::store::{into_fields, DocumentStore, Fields, StorageError};

/// A typed record persisted in one collection of a [`DocumentStore`].
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// Typed view over one collection.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _phantom: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    pub async fn select_any(&self, filter: &Filter) -> Result<Vec<T>, StorageError> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn select_one(&self, filter: &Filter) -> Result<Option<T>, StorageError> {
        let first = self.store.find(T::COLLECTION, filter).await?.into_iter().next();
        first.map(decode).transpose()
    }

    pub async fn select_id(&self, id: Uuid) -> Result<Option<T>, StorageError> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn insert(&self, record: &T) -> Result<(), StorageError> {
        let body = encode(T::COLLECTION, record)?;
        self.store.insert(T::COLLECTION, record.id(), body).await
    }

    /// Merge the serialized `changes` into the stored record. Fields the
    /// changes omit when serialized keep their stored values.
    pub async fn update_id<C: Serialize>(&self, id: Uuid, changes: &C) -> Result<Option<T>, StorageError> {
        let changes = encode(T::COLLECTION, changes)?;
        self.store
            .update_by_id(T::COLLECTION, id, changes)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn delete_id(&self, id: Uuid) -> Result<bool, StorageError> {
        self.store.delete_by_id(T::COLLECTION, id).await
    }
}

fn encode<S: Serialize>(collection: &str, value: &S) -> Result<Fields, StorageError> {
    into_fields(collection, serde_json::to_value(value)?)
}

fn decode<T: DeserializeOwned>(fields: Fields) -> Result<T, StorageError> {
    Ok(serde_json::from_value(Value::Object(fields))?)
}
