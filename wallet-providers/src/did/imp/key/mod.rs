//! Implementation of did:key.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    common_models::did::DidValue,
    did::{
        error::DidMethodError,
        imp::key_helpers::{decode_did, generate_document, DidKeyType},
        model::{DidDocument, DidKey},
        DidMethod,
    },
    key_algorithm::{
        imp::eddsa::{ed25519_public_key_to_x25519, x25519_jwk, x25519_multibase},
        provider::KeyAlgorithmProvider,
    },
};


pub struct KeyDidMethod {
    pub key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
}

impl KeyDidMethod {
    pub fn new(key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>) -> Self {
        Self {
            key_algorithm_provider,
        }
    }
}

#[async_trait]
impl DidMethod for KeyDidMethod {
    async fn create(&self, key: &DidKey) -> Result<DidValue, DidMethodError> {
        let key_algorithm = self
            .key_algorithm_provider
            .get_key_algorithm(&key.key_type)
            .ok_or(DidMethodError::KeyAlgorithmNotFound)?;
        let multibase = key_algorithm
            .get_multibase(&key.public_key)
            .map_err(|e| DidMethodError::CouldNotCreate(e.to_string()))?;
        Ok(format!("did:key:{}", multibase).into())
    }

    async fn resolve(&self, did_value: &DidValue) -> Result<DidDocument, DidMethodError> {
        let decoded = decode_did(did_value)?;

        let jwk = self
            .key_algorithm_provider
            .get_key_algorithm(decoded.type_.key_algorithm_id())
            .ok_or(DidMethodError::KeyAlgorithmNotFound)?
            .bytes_to_jwk(&decoded.decoded_multibase, None)
            .map_err(|_| {
                DidMethodError::ResolutionError("Could not create jwk representation".to_string())
            })?;

        let key_agreement = match decoded.type_ {
            DidKeyType::Eddsa => {
                let x25519 = ed25519_public_key_to_x25519(&decoded.decoded_multibase)
                    .map_err(|e| DidMethodError::ResolutionError(e.to_string()))?;
                let jwk = x25519_jwk(&x25519)
                    .map_err(|e| DidMethodError::ResolutionError(e.to_string()))?;
                Some((x25519_multibase(&x25519), jwk))
            }
            DidKeyType::Ecdsa => None,
        };

        Ok(generate_document(decoded, did_value, jwk, key_agreement))
    }
}
