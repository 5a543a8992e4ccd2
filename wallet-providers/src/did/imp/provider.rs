use std::{collections::HashMap, sync::Arc};

use crate::{
    common_models::did::DidValue,
    did::{
        error::DidMethodProviderError,
        imp::resolver::{DidCachingLoader, DidResolver},
        model::DidDocument,
        provider::DidMethodProvider,
        DidMethod,
    },
};

pub struct DidMethodProviderImpl {
    caching_loader: DidCachingLoader,
    resolver: DidResolver,
}

impl DidMethodProviderImpl {
    pub fn new(
        caching_loader: DidCachingLoader,
        did_methods: HashMap<String, Arc<dyn DidMethod>>,
    ) -> Self {
        Self {
            caching_loader,
            resolver: DidResolver { did_methods },
        }
    }
}

#[async_trait::async_trait]
impl DidMethodProvider for DidMethodProviderImpl {
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodProviderError> {
        let result = self
            .caching_loader
            .resolve(did.as_str(), &self.resolver)
            .await?;
        Ok(serde_json::from_slice(&result)?)
    }

    async fn clear_cache(&self) -> Result<(), DidMethodProviderError> {
        self.caching_loader.clear().await?;
        tracing::debug!("did document cache cleared");
        Ok(())
    }
}
