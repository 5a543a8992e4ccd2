//! Lookup of key algorithms and their signers.

use std::sync::Arc;

use wallet_crypto::Signer;

use super::{error::KeyAlgorithmProviderError, KeyAlgorithm};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait KeyAlgorithmProvider: Send + Sync {
    /// By provider id, see [`super::model::KeyAlgorithmType`].
    fn get_key_algorithm(&self, algorithm: &str) -> Option<Arc<dyn KeyAlgorithm>>;

    /// Signer of the crypto provider backing `algorithm`.
    fn get_signer(&self, algorithm: &str) -> Result<Arc<dyn Signer>, KeyAlgorithmProviderError>;
}
