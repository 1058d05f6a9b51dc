use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::filter::Filter;
use super::store::{DocumentStore, Fields, StorageError};
use super::UNIQUE_FIELDS;

/// In-process document store.
///
/// Documents are kept per collection in insertion order. Unique fields are
/// checked under the write lock, so two concurrent inserts of the same value
/// cannot both succeed.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(Uuid, Fields)>>>,
    unique: Vec<(String, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            unique: UNIQUE_FIELDS
                .iter()
                .map(|(collection, field)| (collection.to_string(), field.to_string()))
                .collect(),
        }
    }

    /// Number of documents currently held in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn unique_fields<'a>(&'a self, collection: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.unique
            .iter()
            .filter(move |(c, _)| c == collection)
            .map(|(_, field)| field.as_str())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Fields>, StorageError> {
        let collections = self.collections.read().await;
        let found = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, body)| filter.matches(body))
                    .map(|(_, body)| body.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(found)
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Fields>, StorageError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| *doc_id == id))
            .map(|(_, body)| body.clone()))
    }

    async fn insert(&self, collection: &str, id: Uuid, body: Fields) -> Result<(), StorageError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        for field in self.unique_fields(collection) {
            let Some(value) = body.get(field) else { continue };
            if docs.iter().any(|(_, existing)| existing.get(field) == Some(value)) {
                return Err(StorageError::Duplicate {
                    collection: collection.to_string(),
                    field: field.to_string(),
                });
            }
        }

        docs.push((id, body));
        debug!("Inserted document {} into {}", id, collection);
        Ok(())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        changes: Fields,
    ) -> Result<Option<Fields>, StorageError> {
        let mut collections = self.collections.write().await;
        let Some(body) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| *doc_id == id))
            .map(|(_, body)| body)
        else {
            return Ok(None);
        };

        for (field, value) in changes {
            body.insert(field, value);
        }
        Ok(Some(body.clone()))
    }

    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<bool, StorageError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|(doc_id, _)| *doc_id != id);
        Ok(docs.len() < before)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{PROJECTS, USERS};
    use serde_json::{json, Value};

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn find_preserves_insertion_order() {
        let store = MemoryStore::new();
        let creator = Uuid::new_v4();
        for name in ["first", "second", "third"] {
            let id = Uuid::new_v4();
            let body = fields(json!({ "id": id, "name": name, "creator": creator }));
            store.insert(PROJECTS, id, body).await.unwrap();
        }

        let found = store
            .find(PROJECTS, &Filter::new().eq_id("creator", creator))
            .await
            .unwrap();
        let names: Vec<_> = found.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn unique_field_rejects_second_insert() {
        let store = MemoryStore::new();
        let first = Uuid::new_v4();
        store
            .insert(USERS, first, fields(json!({ "id": first, "email": "a@x.com" })))
            .await
            .unwrap();

        let second = Uuid::new_v4();
        let err = store
            .insert(USERS, second, fields(json!({ "id": second, "email": "a@x.com" })))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Duplicate { ref field, .. } if field == "email"));
        assert_eq!(store.len(USERS).await, 1);
    }

    #[tokio::test]
    async fn uniqueness_is_scoped_to_its_collection() {
        let store = MemoryStore::new();
        for _ in 0..2 {
            let id = Uuid::new_v4();
            store
                .insert(PROJECTS, id, fields(json!({ "id": id, "email": "same@x.com" })))
                .await
                .unwrap();
        }
        assert_eq!(store.len(PROJECTS).await, 2);
    }

    #[tokio::test]
    async fn update_merges_supplied_fields_only() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store
            .insert(PROJECTS, id, fields(json!({ "id": id, "name": "Old", "status": false })))
            .await
            .unwrap();

        let merged = store
            .update_by_id(PROJECTS, id, fields(json!({ "status": true })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(merged["name"], "Old");
        assert_eq!(merged["status"], true);

        let stored = store.find_by_id(PROJECTS, id).await.unwrap().unwrap();
        assert_eq!(stored, merged);
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_id() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();
        assert!(store
            .update_by_id(PROJECTS, missing, Fields::new())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_by_id(PROJECTS, missing).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store
            .insert(PROJECTS, id, fields(json!({ "id": id })))
            .await
            .unwrap();

        assert!(store.delete_by_id(PROJECTS, id).await.unwrap());
        assert!(store.find_by_id(PROJECTS, id).await.unwrap().is_none());
        assert_eq!(store.len(PROJECTS).await, 0);
    }
}
