use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::storage::{
    error::{ContentStoreError, CredentialIndexError},
    model::IndexEntry,
    ContentStore, CredentialIndex,
};

#[derive(Default)]
pub struct InMemoryContentStore {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn put(&self, id: &str, content: Vec<u8>) -> Result<(), ContentStoreError> {
        let mut hash_map_handle = self.storage.lock().await;

        if hash_map_handle.contains_key(id) {
            return Err(ContentStoreError::AlreadyExists(id.to_owned()));
        }

        hash_map_handle.insert(id.to_owned(), content);

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, ContentStoreError> {
        let hash_map_handle = self.storage.lock().await;

        Ok(hash_map_handle.get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryCredentialIndex {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

#[async_trait]
impl CredentialIndex for InMemoryCredentialIndex {
    async fn insert(&self, entry: IndexEntry) -> Result<(), CredentialIndexError> {
        let mut handle = self.entries.lock().await;

        if handle.contains_key(&entry.title) {
            return Err(CredentialIndexError::DuplicateTitle(entry.title));
        }

        handle.insert(entry.title, entry.uri);

        Ok(())
    }

    async fn get(&self, title: &str) -> Result<Option<IndexEntry>, CredentialIndexError> {
        let handle = self.entries.lock().await;

        Ok(handle.get(title).map(|uri| IndexEntry {
            title: title.to_owned(),
            uri: uri.to_owned(),
        }))
    }

    async fn list(&self) -> Result<Vec<IndexEntry>, CredentialIndexError> {
        let handle = self.entries.lock().await;

        Ok(handle
            .iter()
            .map(|(title, uri)| IndexEntry {
                title: title.to_owned(),
                uri: uri.to_owned(),
            })
            .collect())
    }

    async fn remove(&self, title: &str) -> Result<bool, CredentialIndexError> {
        let mut handle = self.entries.lock().await;

        Ok(handle.remove(title).is_some())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_content_store_put_get() {
        let store = InMemoryContentStore::default();

        store.put("a", vec![1, 2]).await.unwrap();

        assert_eq!(Some(vec![1, 2]), store.get("a").await.unwrap());
        assert_eq!(None, store.get("b").await.unwrap());
    }

    #[tokio::test]
    async fn test_content_store_never_overwrites() {
        let store = InMemoryContentStore::default();

        store.put("a", vec![1]).await.unwrap();

        assert_eq!(
            Err(ContentStoreError::AlreadyExists("a".to_string())),
            store.put("a", vec![2]).await
        );
        assert_eq!(Some(vec![1]), store.get("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_index_lists_in_title_order() {
        let index = InMemoryCredentialIndex::default();

        for title in ["zeta", "alpha", "mu"] {
            index
                .insert(IndexEntry {
                    title: title.to_string(),
                    uri: format!("lc:credential:{title}"),
                })
                .await
                .unwrap();
        }

        let titles: Vec<String> = index
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.title)
            .collect();

        assert_eq!(vec!["alpha", "mu", "zeta"], titles);
    }

    #[tokio::test]
    async fn test_index_duplicate_title_and_remove() {
        let index = InMemoryCredentialIndex::default();
        let entry = IndexEntry {
            title: "diploma".to_string(),
            uri: "lc:credential:1".to_string(),
        };

        index.insert(entry.clone()).await.unwrap();
        assert_eq!(
            Err(CredentialIndexError::DuplicateTitle("diploma".to_string())),
            index.insert(entry.clone()).await
        );
        assert_eq!(Some(entry), index.get("diploma").await.unwrap());

        assert!(index.remove("diploma").await.unwrap());
        assert!(!index.remove("diploma").await.unwrap());
        assert_eq!(None, index.get("diploma").await.unwrap());
    }
}
