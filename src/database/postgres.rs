use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use super::filter::Filter;
use super::store::{into_fields, DocumentStore, Fields, StorageError};
use super::{COLLECTIONS, UNIQUE_FIELDS};
use crate::config::DatabaseConfig;

/// SQLSTATE raised by PostgreSQL on a unique index violation.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed document store.
///
/// Each collection is a table of `(seq, id, body JSONB)`. Filters are JSONB
/// containment matches, updates are JSONB concatenation, and every unique
/// field gets an expression index on `body->>'field'`.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;
        info!(
            "Created database pool (max_connections={})",
            config.max_connections
        );
        Ok(Self { pool })
    }

    /// Create collection tables and unique indexes if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        for collection in COLLECTIONS {
            let table = Self::table(collection)?;
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    seq BIGSERIAL NOT NULL,
                    id UUID PRIMARY KEY,
                    body JSONB NOT NULL
                )"
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }

        for (collection, field) in UNIQUE_FIELDS {
            let table = Self::table(collection)?;
            let index = quote_identifier(&unique_index_name(collection, field));
            let sql = format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {index} ON {table} ((body->>{}))",
                quote_literal(field)
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }

        info!("Document tables ready: {}", COLLECTIONS.join(", "));
        Ok(())
    }

    /// Quoted table name for a known collection.
    fn table(collection: &str) -> Result<String, StorageError> {
        if !COLLECTIONS.contains(&collection) {
            return Err(StorageError::UnknownCollection(collection.to_string()));
        }
        Ok(quote_identifier(collection))
    }

    fn map_insert_error(collection: &str, err: sqlx::Error) -> StorageError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StorageError::Duplicate {
                    collection: collection.to_string(),
                    field: duplicate_field(collection, db_err.constraint()).to_string(),
                };
            }
        }
        StorageError::Sqlx(err)
    }

    fn body_of(collection: &str, row: &sqlx::postgres::PgRow) -> Result<Fields, StorageError> {
        let body: Value = row.try_get("body")?;
        into_fields(collection, body)
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Fields>, StorageError> {
        let table = Self::table(collection)?;
        let sql = format!("SELECT body FROM {table} WHERE body @> $1 ORDER BY seq");
        let rows = sqlx::query(&sql)
            .bind(filter.to_value())
            .fetch_all(&self.pool)
            .await?;
        debug!("{} row(s) from {} matching {:?}", rows.len(), collection, filter);
        rows.iter().map(|row| Self::body_of(collection, row)).collect()
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Fields>, StorageError> {
        let table = Self::table(collection)?;
        let sql = format!("SELECT body FROM {table} WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| Self::body_of(collection, &row)).transpose()
    }

    async fn insert(&self, collection: &str, id: Uuid, body: Fields) -> Result<(), StorageError> {
        let table = Self::table(collection)?;
        let sql = format!("INSERT INTO {table} (id, body) VALUES ($1, $2)");
        sqlx::query(&sql)
            .bind(id)
            .bind(Value::Object(body))
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_insert_error(collection, e))?;
        debug!("Inserted document {} into {}", id, collection);
        Ok(())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        changes: Fields,
    ) -> Result<Option<Fields>, StorageError> {
        let table = Self::table(collection)?;
        let sql = format!("UPDATE {table} SET body = body || $2 WHERE id = $1 RETURNING body");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(Value::Object(changes))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| Self::body_of(collection, &row)).transpose()
    }

    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<bool, StorageError> {
        let table = Self::table(collection)?;
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn unique_index_name(collection: &str, field: &str) -> String {
    format!("{collection}_{field}_key")
}

/// Field named by a violated unique constraint. Anything other than a
/// configured unique index is the primary key.
fn duplicate_field(collection: &str, constraint: Option<&str>) -> &'static str {
    UNIQUE_FIELDS
        .iter()
        .find(|(c, field)| *c == collection && constraint == Some(unique_index_name(c, field).as_str()))
        .map(|(_, field)| *field)
        .unwrap_or("id")
}

/// Quote SQL identifier to prevent injection
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
