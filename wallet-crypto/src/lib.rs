//! Signing, hashing and encryption of raw bytes.
//!
//! This crate holds every primitive that touches key material directly: the
//! Ed25519 and ES256 signers, the SHA-256 hasher and the building blocks of the
//! multi-recipient JWE envelope (XChaCha20-Poly1305, X25519 and the JOSE Concat KDF).
//! Protocol-level code lives in `wallet-providers` and reaches the primitives
//! through the [`CryptoProvider`] trait.

use std::sync::Arc;

use thiserror::Error;

pub mod imp;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CryptoProviderError {
    #[error("No hasher registered as `{0}`")]
    MissingHasher(String),
    #[error("No signer registered as `{0}`")]
    MissingSigner(String),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum HasherError {
    #[error("Could not hash")]
    CouldNotHash,
    #[error(transparent)]
    Provider(#[from] CryptoProviderError),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error(transparent)]
    Provider(#[from] CryptoProviderError),
    #[error("Could not sign: `{0}`")]
    CouldNotSign(String),
    #[error("Key pair does not match the algorithm")]
    CouldNotExtractKeyPair,
    #[error("Invalid public key: `{0}`")]
    CouldNotExtractPublicKey(String),
    #[error("Could not verify: `{0}`")]
    CouldNotVerify(String),
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("No usable key")]
    MissingKey,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Hasher: Send + Sync {
    fn hash(&self, input: &[u8]) -> Result<Vec<u8>, HasherError>;

    /// Digest as unpadded base64url.
    fn hash_base64(&self, input: &[u8]) -> Result<String, HasherError>;
}

/// Signs and verifies raw bytes with one algorithm.
///
/// Several implementations may exist for one algorithm (see the Ed25519 engines in
/// [`imp::signer`]); they are interchangeable and must produce identical output.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Signer: Send + Sync {
    fn sign(
        &self,
        input: &[u8],
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SignerError>;

    /// `Ok(())` only for a valid signature over `input`.
    fn verify(&self, input: &[u8], signature: &[u8], public_key: &[u8]) -> Result<(), SignerError>;
}

/// Registry of hashers and signers, keyed by algorithm name.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CryptoProvider: Send + Sync {
    fn get_hasher(&self, name: &str) -> Result<Arc<dyn Hasher>, CryptoProviderError>;

    fn get_signer(&self, name: &str) -> Result<Arc<dyn Signer>, CryptoProviderError>;
}
