pub use wallet_crypto::SignerError;

pub use crate::credential_formatter::model::SignatureProvider;

/// Signs with a closure and reports `#key0` as key id.
pub struct MockAuth<F: Fn(&[u8]) -> Vec<u8> + Send + Sync>(pub F);

#[async_trait::async_trait]
impl<F: Fn(&[u8]) -> Vec<u8> + Send + Sync> SignatureProvider for MockAuth<F> {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        Ok(self.0(message))
    }
    fn get_key_id(&self) -> Option<String> {
        Some("#key0".to_owned())
    }
    fn get_public_key(&self) -> Vec<u8> {
        vec![]
    }
}
