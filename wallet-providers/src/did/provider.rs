//! DID method provider.

use crate::{
    common_models::did::DidValue,
    did::{error::DidMethodProviderError, model::DidDocument},
};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait DidMethodProvider: Send + Sync {
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodProviderError>;

    /// Drops every cached DID document.
    async fn clear_cache(&self) -> Result<(), DidMethodProviderError>;
}
