//! Read-through cache in front of a remote [`Resolver`].
//!
//! The resolver is passed per call, so one loader can serve resolvers that only exist at
//! call time.
//!
//! Entries are served from storage until `refresh_after` has passed. Between `refresh_after`
//! and `cache_refresh_timeout` a refresh is attempted and the stale value is kept if it fails.
//! Past `cache_refresh_timeout` the entry must be refreshed. Failed resolutions are never stored.

use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

use crate::cache_storage::{CacheEntry, CacheKind, CacheStorage, CacheStorageError};


#[async_trait]
pub trait Resolver: Send + Sync {
    type Error: From<CacheStorageError>;

    async fn do_resolve(&self, key: &str) -> Result<Vec<u8>, Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Freshness {
    Fresh,
    Stale,
    Expired,
}

pub struct CachingLoader<E> {
    pub kind: CacheKind,
    pub storage: Arc<dyn CacheStorage>,

    pub cache_size: usize,
    pub cache_refresh_timeout: Duration,
    pub refresh_after: Duration,

    eviction: Mutex<()>,
    error: PhantomData<fn() -> E>,
}

impl<E: From<CacheStorageError>> CachingLoader<E> {
    pub fn new(
        kind: CacheKind,
        storage: Arc<dyn CacheStorage>,
        cache_size: usize,
        cache_refresh_timeout: Duration,
        refresh_after: Duration,
    ) -> Self {
        Self {
            kind,
            storage,
            cache_size,
            cache_refresh_timeout,
            refresh_after,
            eviction: Mutex::new(()),
            error: PhantomData,
        }
    }

    pub async fn resolve(
        &self,
        key: &str,
        resolver: &dyn Resolver<Error = E>,
    ) -> Result<Vec<u8>, E> {
        let mut entry = match self.storage.get(key).await? {
            Some(cached) => self.revalidate(cached, resolver).await?,
            None => {
                tracing::debug!(kind = %self.kind, key, "cache miss");
                let now = OffsetDateTime::now_utc();
                CacheEntry {
                    key: key.to_owned(),
                    kind: self.kind,
                    value: resolver.do_resolve(key).await?,
                    hits: 0,
                    last_modified: now,
                    last_accessed: now,
                }
            }
        };
        entry.last_accessed = OffsetDateTime::now_utc();

        let value = entry.value.clone();
        self.storage.put(entry).await?;
        self.evict_if_full().await?;

        Ok(value)
    }

    /// Drops every cached entry of this loader's kind.
    pub async fn clear(&self) -> Result<(), CacheStorageError> {
        self.storage.remove_all(self.kind).await
    }

    async fn revalidate(
        &self,
        mut cached: CacheEntry,
        resolver: &dyn Resolver<Error = E>,
    ) -> Result<CacheEntry, E> {
        cached.hits = cached.hits.saturating_add(1);

        let freshness = self.freshness(cached.last_modified);
        if freshness == Freshness::Fresh {
            tracing::debug!(kind = %self.kind, key = %cached.key, "cache hit");
            return Ok(cached);
        }

        tracing::debug!(kind = %self.kind, key = %cached.key, ?freshness, "refreshing cache entry");
        match resolver.do_resolve(&cached.key).await {
            Ok(value) => {
                cached.value = value;
                cached.last_modified = OffsetDateTime::now_utc();
            }
            Err(error) if freshness == Freshness::Expired => return Err(error),
            Err(_) => {
                tracing::warn!(kind = %self.kind, key = %cached.key, "refresh failed, serving stale entry");
            }
        }

        Ok(cached)
    }

    fn freshness(&self, last_modified: OffsetDateTime) -> Freshness {
        let age = OffsetDateTime::now_utc() - last_modified;

        if age <= self.refresh_after {
            Freshness::Fresh
        } else if age <= self.cache_refresh_timeout {
            Freshness::Stale
        } else {
            Freshness::Expired
        }
    }

    async fn evict_if_full(&self) -> Result<(), CacheStorageError> {
        let _guard = self.eviction.lock().await;

        if self.storage.count(self.kind).await? > self.cache_size {
            self.storage.evict_least_recently_used(self.kind).await?;
        }

        Ok(())
    }
}
