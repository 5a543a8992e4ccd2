use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    caching_loader::{CachingLoader, Resolver},
    common_models::did::DidValue,
    did::{error::DidMethodProviderError, DidMethod},
};

pub type DidCachingLoader = CachingLoader<DidMethodProviderError>;

pub struct DidResolver {
    pub did_methods: HashMap<String, Arc<dyn DidMethod>>,
}

#[async_trait]
impl Resolver for DidResolver {
    type Error = DidMethodProviderError;

    async fn do_resolve(&self, did_value: &str) -> Result<Vec<u8>, Self::Error> {
        let did_method_id = did_method_id_from_value(did_value)?;

        let method = self
            .did_methods
            .get(&did_method_id)
            .ok_or(DidMethodProviderError::MissingProvider(did_method_id))?;

        let did_value = DidValue::from(did_value.to_string());
        let document = method.resolve(&did_value).await?;

        if document.id != did_value {
            return Err(DidMethodProviderError::DocumentIdMismatch {
                requested: did_value.to_string(),
                resolved: document.id.to_string(),
            });
        }

        Ok(serde_json::to_vec(&document)?)
    }
}

pub(crate) fn did_method_id_from_value(did_value: &str) -> Result<String, DidMethodProviderError> {
    let mut parts = did_value.splitn(3, ':');

    if parts.next() != Some("did") {
        return Err(DidMethodProviderError::MissingDidMethodNameInDidValue);
    }

    let did_method = parts
        .next()
        .filter(|method| !method.is_empty())
        .ok_or(DidMethodProviderError::MissingDidMethodNameInDidValue)?;
    Ok(did_method.to_uppercase())
}
