//! Record store adapter: one CRUD surface over the relational table or the key-value namespace.
//!
//! Backends are picked once by [`open_store`]; request handlers only see `Arc<dyn TodoStore>`.

pub mod kv;
pub mod relational;

use crate::config::{KvEngine, Settings, StoreKind};
use crate::error::AppError;
use crate::model::{Backend, Todo, TodoId, TodoPatch};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub use kv::{KvNamespace, KvTodoStore, MemoryKv, SqliteKv, TODO_PREFIX};
pub use relational::SqlTodoStore;

/// What `list` does when the backend faults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListFailurePolicy {
    /// Log the fault and return an empty list.
    FailSoft,
    /// Propagate the fault to the caller.
    FailHard,
}

/// Write discipline for `update`'s read-modify-write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConcurrencyMode {
    /// Overwrite unconditionally; concurrent writers race and the last one wins.
    #[default]
    LastWriterWins,
    /// Write only if the record still matches what was read, else `AppError::Conflict`.
    CompareAndSwap,
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    fn backend(&self) -> Backend;

    /// Interpret a path segment as an id of this store's scheme. `None` never matches a record.
    fn parse_id(&self, raw: &str) -> Option<TodoId>;

    async fn list(&self) -> Result<Vec<Todo>, AppError>;

    async fn get(&self, id: &TodoId) -> Result<Option<Todo>, AppError>;

    /// Assign an id and persist a new, not completed todo.
    async fn create(&self, title: &str) -> Result<Todo, AppError>;

    /// Merge `patch` into the stored record. A missing id is logged and ignored.
    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<(), AppError>;

    /// Remove the record; a missing id is a no-op.
    async fn delete(&self, id: &TodoId) -> Result<(), AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Apply the list policy to a raw backend result.
pub(crate) fn apply_list_policy(
    policy: ListFailurePolicy,
    backend: Backend,
    result: Result<Vec<Todo>, AppError>,
) -> Result<Vec<Todo>, AppError> {
    match (result, policy) {
        (Ok(todos), _) => Ok(todos),
        (Err(e), ListFailurePolicy::FailSoft) => {
            tracing::error!(error = %e, backend = ?backend, "failed to list todos; returning empty list");
            Ok(Vec::new())
        }
        (Err(e), ListFailurePolicy::FailHard) => Err(e),
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Open a SQLite pool. In-memory databases are pinned to one long-lived connection so every query sees the same data.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = if is_memory_url(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?
    };
    Ok(pool)
}

/// Build the configured store, creating its tables if needed.
pub async fn open_store(settings: &Settings) -> Result<Arc<dyn TodoStore>, AppError> {
    let policy = settings.effective_list_policy();
    let store: Arc<dyn TodoStore> = match (settings.store, settings.kv_engine) {
        (StoreKind::Relational, _) => {
            let pool = connect_pool(&settings.database_url, settings.max_connections).await?;
            relational::ensure_todos_table(&pool).await?;
            Arc::new(
                SqlTodoStore::new(pool)
                    .with_list_policy(policy)
                    .with_concurrency(settings.concurrency),
            )
        }
        (StoreKind::KeyValue, KvEngine::Sqlite) => {
            let pool = connect_pool(&settings.database_url, settings.max_connections).await?;
            kv::sqlite::ensure_kv_table(&pool).await?;
            Arc::new(
                KvTodoStore::new(SqliteKv::new(pool))
                    .with_list_policy(policy)
                    .with_concurrency(settings.concurrency)
                    .with_verify_writes(settings.kv_verify_writes),
            )
        }
        (StoreKind::KeyValue, KvEngine::Memory) => Arc::new(
            KvTodoStore::new(MemoryKv::new())
                .with_list_policy(policy)
                .with_concurrency(settings.concurrency)
                .with_verify_writes(settings.kv_verify_writes),
        ),
    };
    tracing::info!(backend = ?store.backend(), list_policy = ?policy, concurrency = ?settings.concurrency, "todo store ready");
    Ok(store)
}
