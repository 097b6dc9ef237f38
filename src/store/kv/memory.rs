//! Process-local namespace. Keys enumerate in lexical order.

use super::KvNamespace;
use crate::error::KvError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryKv {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvNamespace for MemoryKv {
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KvError> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), KvError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn compare_and_put(&self, key: &str, expected: &str, value: String) -> Result<bool, KvError> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(current) if current == expected => {
                *current = value;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
