//! Signature checks against keys published in a resolved DID document.

use std::sync::Arc;

use async_trait::async_trait;
use wallet_crypto::SignerError;

use crate::{
    common_models::did::{DidValue, KeyRole},
    credential_formatter::model::TokenVerifier,
    did::model::{DidDocument, DidVerificationMethod},
    key_algorithm::{model::KeyAlgorithmType, provider::KeyAlgorithmProvider},
};

/// [`TokenVerifier`] bound to one already resolved document.
///
/// The signing key must be listed under `role`. Without an explicit key id the first key of
/// that relationship is used. The issuer passed by the proof format is ignored because the
/// document was resolved by the caller.
#[derive(Clone)]
pub struct DocumentKeyVerifier {
    pub key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    pub document: DidDocument,
    pub role: KeyRole,
}

impl DocumentKeyVerifier {
    fn select_method(&self, key_id: Option<&str>) -> Result<&DidVerificationMethod, SignerError> {
        let listed = self.document.relationship(self.role);

        let id = match key_id {
            Some(key_id) => self.document.absolute_id(key_id),
            None => listed.first().cloned().ok_or(SignerError::MissingKey)?,
        };

        if !listed.contains(&id) {
            return Err(SignerError::CouldNotVerify(format!(
                "`{id}` is not a {} key of {}",
                self.role, self.document.id
            )));
        }

        self.document
            .find_verification_method(&id)
            .ok_or(SignerError::MissingKey)
    }
}

#[async_trait]
impl TokenVerifier for DocumentKeyVerifier {
    async fn verify<'a>(
        &self,
        _issuer: Option<DidValue>,
        key_id: Option<&'a str>,
        algorithm: &'a str,
        message: &'a [u8],
        signature: &'a [u8],
    ) -> Result<(), SignerError> {
        let method = self.select_method(key_id)?;
        let public_key_jwk = method
            .jwk()
            .map_err(|e| SignerError::CouldNotVerify(e.to_string()))?;

        let unsupported =
            || SignerError::CouldNotVerify(format!("Unsupported algorithm `{algorithm}`"));
        let algorithm_id = KeyAlgorithmType::from_jose_alg(algorithm)
            .ok_or_else(unsupported)?
            .to_string();

        let public_key = self
            .key_algorithm_provider
            .get_key_algorithm(&algorithm_id)
            .ok_or_else(unsupported)?
            .jwk_to_bytes(&public_key_jwk)
            .map_err(|e| SignerError::CouldNotVerify(e.to_string()))?;

        self.key_algorithm_provider
            .get_signer(&algorithm_id)
            .map_err(|e| SignerError::CouldNotVerify(e.to_string()))?
            .verify(message, signature, &public_key)
    }
}
