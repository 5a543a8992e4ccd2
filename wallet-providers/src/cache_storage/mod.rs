//! Backing store for [`crate::caching_loader::CachingLoader`].
//!
//! Entries are grouped by [`CacheKind`] so DID documents and fetched credentials can share
//! one store without evicting each other.

use std::cmp::Ordering;

use thiserror::Error;
use time::OffsetDateTime;

pub mod in_memory;


#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait CacheStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheStorageError>;

    /// Stores `entry`, replacing any entry under the same key.
    async fn put(&self, entry: CacheEntry) -> Result<(), CacheStorageError>;

    async fn count(&self, kind: CacheKind) -> Result<usize, CacheStorageError>;

    /// Removes the entry of `kind` that sorts first by [`CacheEntry::eviction_order`].
    async fn evict_least_recently_used(&self, kind: CacheKind) -> Result<(), CacheStorageError>;

    async fn remove_all(&self, kind: CacheKind) -> Result<(), CacheStorageError>;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub kind: CacheKind,
    pub value: Vec<u8>,
    pub hits: u32,
    /// When `value` was last fetched from the source.
    pub last_modified: OffsetDateTime,
    /// When the entry was last served.
    pub last_accessed: OffsetDateTime,
}

impl CacheEntry {
    /// Least recently accessed first, then fewest hits.
    pub fn eviction_order(&self, other: &Self) -> Ordering {
        (self.last_accessed, self.hits).cmp(&(other.last_accessed, other.hits))
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display)]
pub enum CacheKind {
    DidDocument,
    Credential,
}

#[derive(Clone, Error, Debug)]
pub enum CacheStorageError {
    #[error("Cache backend unavailable: `{0}`")]
    Unavailable(String),
}
