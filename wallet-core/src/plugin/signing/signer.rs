use std::sync::Arc;

use async_trait::async_trait;
use wallet_crypto::{Signer, SignerError};
use wallet_providers::credential_formatter::model::SignatureProvider;

use crate::model::Keypair;

/// Signs with a wallet key pair on behalf of a proof format.
pub(super) struct KeypairSigner {
    pub signer: Arc<dyn Signer>,
    pub keypair: Keypair,
    pub key_id: String,
}

#[async_trait]
impl SignatureProvider for KeypairSigner {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        self.signer.sign(
            message,
            &self.keypair.public_key,
            &self.keypair.private_key,
        )
    }

    fn get_key_id(&self) -> Option<String> {
        Some(self.key_id.to_owned())
    }

    fn get_public_key(&self) -> Vec<u8> {
        self.keypair.public_key.to_owned()
    }
}
