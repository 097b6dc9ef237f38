//! Namespace emulated on a SQLite table: one row per key, value stored as JSON text.

use super::KvNamespace;
use crate::error::{AppError, KvError};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub const KV_TABLE: &str = "kv_entries";

pub async fn ensure_kv_table(pool: &SqlitePool) -> Result<(), AppError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
        KV_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

#[derive(Clone)]
pub struct SqliteKv {
    pool: SqlitePool,
}

impl SqliteKv {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteKv { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KvNamespace for SqliteKv {
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KvError> {
        // substr instead of LIKE so '%' and '_' in the prefix stay literal
        let sql = format!(
            "SELECT key FROM {} WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
            KV_TABLE
        );
        tracing::debug!(sql = %sql, prefix, "query");
        let keys: Vec<(String,)> = sqlx::query_as(&sql).bind(prefix).fetch_all(&self.pool).await?;
        Ok(keys.into_iter().map(|(k,)| k).collect())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let sql = format!("SELECT value FROM {} WHERE key = ?", KV_TABLE);
        tracing::debug!(sql = %sql, key, "query");
        let row: Option<(String,)> = sqlx::query_as(&sql).bind(key).fetch_optional(&self.pool).await?;
        Ok(row.map(|(v,)| v))
    }

    async fn put(&self, key: &str, value: String) -> Result<(), KvError> {
        let sql = format!(
            r#"
            INSERT INTO {} (key, value) VALUES (?, ?)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            "#,
            KV_TABLE
        );
        tracing::debug!(sql = %sql, key, "query");
        sqlx::query(&sql).bind(key).bind(value).execute(&self.pool).await?;
        Ok(())
    }

    async fn compare_and_put(&self, key: &str, expected: &str, value: String) -> Result<bool, KvError> {
        let sql = format!("UPDATE {} SET value = ? WHERE key = ? AND value = ?", KV_TABLE);
        tracing::debug!(sql = %sql, key, "query");
        let result = sqlx::query(&sql)
            .bind(value)
            .bind(key)
            .bind(expected)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let sql = format!("DELETE FROM {} WHERE key = ?", KV_TABLE);
        tracing::debug!(sql = %sql, key, "query");
        sqlx::query(&sql).bind(key).execute(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), KvError> {
        if self.pool.is_closed() {
            return Err(KvError::Unavailable("pool closed".into()));
        }
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
