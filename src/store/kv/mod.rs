//! Key-value variant: todos live under `v1:todo:{uuid}` as JSON values; listing is a prefix scan.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

use super::{apply_list_policy, ConcurrencyMode, ListFailurePolicy, TodoStore};
use crate::error::{AppError, KvError};
use crate::model::{Backend, Todo, TodoId, TodoPatch};
use async_trait::async_trait;

pub const TODO_PREFIX: &str = "v1:todo:";

/// Minimal namespace surface: string keys, string values, prefix enumeration.
#[async_trait]
pub trait KvNamespace: Send + Sync {
    /// Keys starting with `prefix`, in the engine's enumeration order.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KvError>;

    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    async fn put(&self, key: &str, value: String) -> Result<(), KvError>;

    /// Store `value` only if the key currently holds exactly `expected`. Returns whether it wrote.
    async fn compare_and_put(&self, key: &str, expected: &str, value: String) -> Result<bool, KvError>;

    async fn delete(&self, key: &str) -> Result<(), KvError>;

    async fn ping(&self) -> Result<(), KvError> {
        Ok(())
    }
}

pub fn todo_key(id: &uuid::Uuid) -> String {
    format!("{}{}", TODO_PREFIX, id)
}

pub struct KvTodoStore<K> {
    kv: K,
    list_policy: ListFailurePolicy,
    concurrency: ConcurrencyMode,
    verify_writes: bool,
}

impl<K: KvNamespace> KvTodoStore<K> {
    pub fn new(kv: K) -> Self {
        KvTodoStore {
            kv,
            list_policy: ListFailurePolicy::FailHard,
            concurrency: ConcurrencyMode::LastWriterWins,
            verify_writes: false,
        }
    }

    pub fn with_list_policy(mut self, policy: ListFailurePolicy) -> Self {
        self.list_policy = policy;
        self
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency = mode;
        self
    }

    /// Read each new key back after `create` and fail if it is not there.
    pub fn with_verify_writes(mut self, verify: bool) -> Self {
        self.verify_writes = verify;
        self
    }

    pub fn namespace(&self) -> &K {
        &self.kv
    }

    async fn scan(&self) -> Result<Vec<Todo>, AppError> {
        let keys = self.kv.list_keys(TODO_PREFIX).await?;
        let mut todos = Vec::with_capacity(keys.len());
        for key in keys {
            // deleted between scan and read
            if let Some(raw) = self.kv.get(&key).await? {
                todos.push(serde_json::from_str(&raw)?);
            }
        }
        Ok(todos)
    }

    async fn read_raw(&self, id: &TodoId) -> Result<Option<(String, String)>, AppError> {
        let TodoId::Uuid(uuid) = id else {
            return Ok(None);
        };
        let key = todo_key(uuid);
        tracing::debug!(key = %key, "kv get");
        Ok(self.kv.get(&key).await?.map(|raw| (key, raw)))
    }
}

#[async_trait]
impl<K: KvNamespace> TodoStore for KvTodoStore<K> {
    fn backend(&self) -> Backend {
        Backend::KeyValue
    }

    fn parse_id(&self, raw: &str) -> Option<TodoId> {
        // keys hold the lowercase hyphenated form, so only that spelling names a record
        uuid::Uuid::try_parse(raw)
            .ok()
            .filter(|uuid| uuid.hyphenated().to_string() == raw)
            .map(TodoId::Uuid)
    }

    async fn list(&self) -> Result<Vec<Todo>, AppError> {
        apply_list_policy(self.list_policy, Backend::KeyValue, self.scan().await)
    }

    async fn get(&self, id: &TodoId) -> Result<Option<Todo>, AppError> {
        match self.read_raw(id).await? {
            Some((_, raw)) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, title: &str) -> Result<Todo, AppError> {
        let uuid = uuid::Uuid::new_v4();
        let todo = Todo {
            id: TodoId::Uuid(uuid),
            title: title.to_string(),
            completed: false,
        };
        let key = todo_key(&uuid);
        tracing::debug!(key = %key, "kv put");
        self.kv.put(&key, serde_json::to_string(&todo)?).await?;
        if self.verify_writes && self.kv.get(&key).await?.is_none() {
            return Err(AppError::CreationFailed(format!("key {} missing after put", key)));
        }
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<(), AppError> {
        let Some((key, raw)) = self.read_raw(id).await? else {
            tracing::warn!(id = %id, "todo not found; update skipped");
            return Ok(());
        };
        let current: Todo = serde_json::from_str(&raw)?;
        let merged = serde_json::to_string(&patch.apply(current))?;
        tracing::debug!(key = %key, "kv put");
        match self.concurrency {
            ConcurrencyMode::LastWriterWins => self.kv.put(&key, merged).await?,
            ConcurrencyMode::CompareAndSwap => {
                if !self.kv.compare_and_put(&key, &raw, merged).await? {
                    return Err(AppError::Conflict(format!("todo {} changed during update", id)));
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), AppError> {
        let TodoId::Uuid(uuid) = id else {
            return Ok(());
        };
        let key = todo_key(uuid);
        tracing::debug!(key = %key, "kv delete");
        self.kv.delete(&key).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.kv.ping().await?;
        Ok(())
    }
}
