//! Wallet configuration.
//!
//! Every section has a default, so a partial JSON document is a valid configuration.

use serde::Deserialize;

use crate::model::{ProofFormat, SigningEngine};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletConfig {
    pub caching: CachingConfig,
    pub did_web: DidWebConfig,
    pub signing: SigningConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CachingConfig {
    pub did: CacheEntityConfig,
    pub credentials: CacheEntityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheEntityConfig {
    pub cache_size: usize,
    pub cache_refresh_timeout_secs: i64,
    pub refresh_after_secs: i64,
}

impl Default for CacheEntityConfig {
    fn default() -> Self {
        Self {
            cache_size: 100,
            cache_refresh_timeout_secs: 86400,
            refresh_after_secs: 300,
        }
    }
}

impl CacheEntityConfig {
    pub fn cache_refresh_timeout(&self) -> time::Duration {
        time::Duration::seconds(self.cache_refresh_timeout_secs)
    }

    pub fn refresh_after(&self) -> time::Duration {
        time::Duration::seconds(self.refresh_after_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DidWebConfig {
    pub resolve_to_insecure_http: bool,
    pub timeout_secs: u64,
}

impl Default for DidWebConfig {
    fn default() -> Self {
        Self {
            resolve_to_insecure_http: false,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SigningConfig {
    pub engine: SigningEngine,
    pub default_proof_format: ProofFormat,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageConfig {
    pub uri_namespace: String,
    /// DIDs that can read every published credential besides the wallet itself.
    pub extra_recipients: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uri_namespace: wallet_providers::storage::model::DEFAULT_NAMESPACE.to_owned(),
            extra_recipients: vec![],
        }
    }
}
