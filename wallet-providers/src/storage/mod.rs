//! Storage seams for published credentials.
//!
//! A [`ContentStore`] keeps opaque encrypted blobs by id. A [`CredentialIndex`] maps
//! human-readable titles to storage URIs, independent of the stored objects.

use async_trait::async_trait;

use error::{ContentStoreError, CredentialIndexError};
use model::IndexEntry;

pub mod error;
pub mod imp;
pub mod model;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Stores `content` under a new id. Existing ids are never overwritten.
    async fn put(&self, id: &str, content: Vec<u8>) -> Result<(), ContentStoreError>;

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, ContentStoreError>;
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CredentialIndex: Send + Sync {
    /// Fails with [`CredentialIndexError::DuplicateTitle`] if the title is taken.
    async fn insert(&self, entry: IndexEntry) -> Result<(), CredentialIndexError>;

    async fn get(&self, title: &str) -> Result<Option<IndexEntry>, CredentialIndexError>;

    /// All entries ordered by title.
    async fn list(&self) -> Result<Vec<IndexEntry>, CredentialIndexError>;

    /// Returns whether an entry was removed.
    async fn remove(&self, title: &str) -> Result<bool, CredentialIndexError>;
}
