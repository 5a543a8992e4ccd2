//! Key algorithm representations.
//!
//! A [`KeyAlgorithm`] derives key pairs, encodes public keys as JWK and multibase, and names
//! the `wallet-crypto` signer that operates on its keys.

use error::KeyAlgorithmError;
use model::GeneratedKey;
use zeroize::Zeroizing;

use crate::common_models::PublicKeyJwk;

pub mod error;
pub mod imp;
pub mod model;
pub mod provider;

/// Find signer IDs and convert key representations.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait KeyAlgorithm: Send + Sync {
    /// Finds related crypto signer ID.
    fn get_signer_algorithm_id(&self) -> String;

    /// Returns base58-btc representation of a public key, multicodec prefixed.
    fn get_multibase(&self, public_key: &[u8]) -> Result<String, KeyAlgorithmError>;

    /// Derives a key-pair from 32 bytes of seed material. Same seed, same key-pair.
    fn key_pair_from_seed(&self, seed: &[u8]) -> Result<GeneratedKey, KeyAlgorithmError>;

    /// Converts public key bytes to JWK.
    fn bytes_to_jwk(
        &self,
        bytes: &[u8],
        r#use: Option<String>,
    ) -> Result<PublicKeyJwk, KeyAlgorithmError>;

    /// Converts JWK to key bytes.
    fn jwk_to_bytes(&self, jwk: &PublicKeyJwk) -> Result<Vec<u8>, KeyAlgorithmError>;

    /// Converts a private key to JWK.
    ///
    /// Use carefully. The returned string contains the private `d` parameter.
    fn private_key_as_jwk(
        &self,
        _secret_key: Zeroizing<Vec<u8>>,
    ) -> Result<Zeroizing<String>, KeyAlgorithmError> {
        Err(KeyAlgorithmError::NotSupported(
            std::any::type_name::<Self>().to_string(),
        ))
    }
}
