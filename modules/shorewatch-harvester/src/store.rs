use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use shorewatch_common::ShorewatchError;

/// The one key the harvester writes and the read endpoint serves.
pub const FEATURE_COLLECTION_KEY: &str = "shorewatch:miles";

/// Opaque key/value cache. Written at most once per run, after validation,
/// so readers never observe a partially assembled collection.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ShorewatchError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), ShorewatchError>;
}

pub struct PgCacheStore {
    pool: PgPool,
}

impl PgCacheStore {
    /// Connect and make sure the cache table exists.
    pub async fn connect(database_url: &str) -> Result<Self, ShorewatchError> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(database_url)
            .await
            .map_err(|e| ShorewatchError::Cache(format!("connect failed: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| ShorewatchError::Cache(format!("table creation failed: {e}")))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CacheStore for PgCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ShorewatchError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM cache_entries WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| ShorewatchError::Cache(e.to_string()))?;
        Ok(row.map(|(value,)| value))
    }

    /// Single-statement upsert, so the replacement is atomically visible.
    async fn put(&self, key: &str, value: &str) -> Result<(), ShorewatchError> {
        sqlx::query(
            r#"
            INSERT INTO cache_entries (key, value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE
                SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| ShorewatchError::Cache(e.to_string()))?;
        Ok(())
    }
}
