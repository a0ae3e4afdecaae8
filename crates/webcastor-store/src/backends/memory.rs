//! Volatile in-process credential store

use crate::{CredentialStore, StoreResult};
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

/// In-memory credential store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        if self.entries.insert(key.to_string(), value).is_some() {
            debug!("Overwrote existing key: {}", key);
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("channel", "open".to_string()).await.unwrap();
        assert_eq!(store.get("channel").await.unwrap(), Some("open".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_key_is_absent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("never-written").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_on_collision() {
        let store = MemoryStore::new();

        store.set("channel", "first".to_string()).await.unwrap();
        store.set("channel", "second".to_string()).await.unwrap();

        assert_eq!(store.get("channel").await.unwrap(), Some("second".to_string()));
        assert_eq!(store.len(), 1);
    }
}
