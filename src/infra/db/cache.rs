//! Database cache driver backed by the `cache_entries` table.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use time::OffsetDateTime;

use crate::cache::{CacheError, CacheStore};

use super::PostgresRepositories;

/// Shares the article pool, so every process pointed at the same database
/// sees the same entries.
#[derive(Clone)]
pub struct PostgresCacheStore {
    db: PostgresRepositories,
}

impl PostgresCacheStore {
    pub fn new(db: PostgresRepositories) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CacheStore for PostgresCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let row: Option<(Json<Value>,)> = sqlx::query_as(
            r#"
            SELECT value
            FROM cache_entries
            WHERE key = $1 AND (expires_at IS NULL OR expires_at > $2)
            "#,
        )
        .bind(key)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(self.db.pool())
        .await
        .map_err(CacheError::backend)?;

        Ok(row.map(|(Json(value),)| value))
    }

    async fn put(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<(), CacheError> {
        let expires_at = ttl.map(|ttl| OffsetDateTime::now_utc() + ttl);

        sqlx::query(
            r#"
            INSERT INTO cache_entries (key, value, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(key)
        .bind(Json(value))
        .bind(expires_at)
        .execute(self.db.pool())
        .await
        .map_err(CacheError::backend)?;

        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<bool, CacheError> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE key = $1")
            .bind(key)
            .execute(self.db.pool())
            .await
            .map_err(CacheError::backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn flush(&self) -> Result<(), CacheError> {
        sqlx::query("DELETE FROM cache_entries")
            .execute(self.db.pool())
            .await
            .map_err(CacheError::backend)?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, CacheError> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE expires_at <= $1")
            .bind(OffsetDateTime::now_utc())
            .execute(self.db.pool())
            .await
            .map_err(CacheError::backend)?;
        Ok(result.rows_affected())
    }
}
