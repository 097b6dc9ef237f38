//! Shared fixtures for integration tests.
//!
//! Each integration test file is its own crate, so helpers unused by one file are expected.

#![allow(dead_code)]

use std::sync::Arc;

use todo_service::store::kv::sqlite::ensure_kv_table;
use todo_service::store::relational::ensure_todos_table;
use todo_service::store::{connect_pool, KvTodoStore, MemoryKv, SqlTodoStore, SqliteKv};
use todo_service::{Backend, TodoId, TodoStore};

pub const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Clone, Copy, Debug)]
pub enum Fixture {
    Relational,
    SqliteKv,
    MemoryKv,
}

pub async fn relational_store() -> SqlTodoStore {
    let pool = connect_pool(MEMORY_URL, 1).await.expect("pool");
    ensure_todos_table(&pool).await.expect("todos table");
    SqlTodoStore::new(pool)
}

pub async fn sqlite_kv_store() -> KvTodoStore<SqliteKv> {
    let pool = connect_pool(MEMORY_URL, 1).await.expect("pool");
    ensure_kv_table(&pool).await.expect("kv table");
    KvTodoStore::new(SqliteKv::new(pool))
}

pub fn memory_kv_store() -> KvTodoStore<MemoryKv> {
    KvTodoStore::new(MemoryKv::new())
}

pub async fn store_for(fixture: Fixture) -> Arc<dyn TodoStore> {
    match fixture {
        Fixture::Relational => Arc::new(relational_store().await),
        Fixture::SqliteKv => Arc::new(sqlite_kv_store().await),
        Fixture::MemoryKv => Arc::new(memory_kv_store()),
    }
}

/// An id in the store's scheme that no record has.
pub fn unknown_id(store: &dyn TodoStore) -> TodoId {
    match store.backend() {
        Backend::Relational => TodoId::Int(9_999),
        Backend::KeyValue => TodoId::Uuid(uuid::Uuid::new_v4()),
    }
}
