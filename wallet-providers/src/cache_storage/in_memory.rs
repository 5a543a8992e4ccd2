use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CacheEntry, CacheKind, CacheStorage, CacheStorageError};

/// Process-local [`CacheStorage`]; contents are lost with the wallet.
#[derive(Default)]
pub struct InMemoryCacheStorage {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryCacheStorage {
    pub fn new(entries: HashMap<String, CacheEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl CacheStorage for InMemoryCacheStorage {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheStorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), CacheStorageError> {
        self.entries.lock().await.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn count(&self, kind: CacheKind) -> Result<usize, CacheStorageError> {
        let entries = self.entries.lock().await;
        Ok(entries.values().filter(|entry| entry.kind == kind).count())
    }

    async fn evict_least_recently_used(&self, kind: CacheKind) -> Result<(), CacheStorageError> {
        let mut entries = self.entries.lock().await;

        let victim = entries
            .values()
            .filter(|entry| entry.kind == kind)
            .min_by(|a, b| a.eviction_order(b))
            .map(|entry| entry.key.clone());

        if let Some(key) = victim {
            entries.remove(&key);
        }
        Ok(())
    }

    async fn remove_all(&self, kind: CacheKind) -> Result<(), CacheStorageError> {
        self.entries.lock().await.retain(|_, entry| entry.kind != kind);
        Ok(())
    }
}
