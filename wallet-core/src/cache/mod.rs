//! Wallets memoized by seed.

use std::{collections::VecDeque, future::Future, sync::Arc};

use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, OnceCell};

use crate::{container::Wallet, error::WalletError};


type Slot = Arc<OnceCell<Wallet>>;

/// Bounded least-recently-used cache of initialized wallets.
///
/// Seeds are never kept, entries are keyed by their SHA-256 digest.
pub struct WalletCache {
    capacity: usize,
    /// Most recently used last. A slot is empty while its wallet is being initialized.
    entries: Mutex<VecDeque<(String, Slot)>>,
}

impl WalletCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Returns the cached wallet for `seed`, running `init` on a miss.
    ///
    /// Concurrent callers for one seed share a single `init`; other seeds are served while it
    /// runs. A failed `init` leaves the cache unchanged.
    pub async fn get_or_init<F, Fut>(&self, seed: &str, init: F) -> Result<Wallet, WalletError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Wallet, WalletError>>,
    {
        let key = hex::encode(Sha256::digest(seed.as_bytes()));
        let slot = self.touch(&key).await;

        if let Some(wallet) = slot.get() {
            tracing::debug!("wallet cache hit");
            return Ok(wallet.clone());
        }

        let result = slot
            .get_or_try_init(|| {
                tracing::debug!("wallet cache miss");
                init()
            })
            .await
            .cloned();

        let mut entries = self.entries.lock().await;
        match result {
            Ok(_) => {
                while entries.len() > self.capacity {
                    entries.pop_front();
                }
            }
            Err(_) => {
                entries.retain(|(_, cached)| !Arc::ptr_eq(cached, &slot) || cached.initialized());
            }
        }

        result
    }

    /// Moves the slot of `key` to the back, creating an empty one if needed.
    async fn touch(&self, key: &str) -> Slot {
        let mut entries = self.entries.lock().await;

        let entry = match entries.iter().position(|(k, _)| k == key) {
            Some(position) => entries.remove(position),
            None => None,
        }
        .unwrap_or_else(|| (key.to_owned(), Arc::default()));

        let slot = entry.1.clone();
        entries.push_back(entry);
        slot
    }

    /// Number of initialized wallets.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.iter().filter(|(_, slot)| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
