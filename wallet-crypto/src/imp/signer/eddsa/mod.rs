//! Ed25519 signing engines.
//!
//! Two engines implement the same [`Signer`] contract: [`PortableEddsaSigner`] on top of
//! `ed25519-compact` and [`NativeEddsaSigner`] on top of `ed25519-dalek`. Ed25519 signatures
//! are deterministic, so both produce the same bytes for the same key and message.
//!
//! Private keys are accepted either as the 32-byte seed or as the 64-byte `seed || public`
//! form.

use ed25519_dalek::{Signer as _, Verifier as _};

use crate::{Signer, SignerError};


const SEED_LENGTH: usize = 32;
const KEYPAIR_LENGTH: usize = 64;

pub struct PortableEddsaSigner {}

impl PortableEddsaSigner {
    fn key_pair(private_key: &[u8]) -> Result<ed25519_compact::KeyPair, SignerError> {
        match private_key.len() {
            SEED_LENGTH => ed25519_compact::Seed::from_slice(private_key)
                .map(ed25519_compact::KeyPair::from_seed)
                .map_err(|_| SignerError::CouldNotExtractKeyPair),
            KEYPAIR_LENGTH => ed25519_compact::KeyPair::from_slice(private_key)
                .map_err(|_| SignerError::CouldNotExtractKeyPair),
            _ => Err(SignerError::CouldNotExtractKeyPair),
        }
    }
}

impl Signer for PortableEddsaSigner {
    fn sign(
        &self,
        input: &[u8],
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SignerError> {
        let key_pair = Self::key_pair(private_key)?;

        if key_pair.pk.as_slice() != public_key {
            return Err(SignerError::CouldNotExtractKeyPair);
        }

        Ok(key_pair.sk.sign(input, None).to_vec())
    }

    fn verify(&self, input: &[u8], signature: &[u8], public_key: &[u8]) -> Result<(), SignerError> {
        let public_key = ed25519_compact::PublicKey::from_slice(public_key)
            .map_err(|e| SignerError::CouldNotExtractPublicKey(e.to_string()))?;

        let signature = ed25519_compact::Signature::from_slice(signature)
            .map_err(|e| SignerError::CouldNotVerify(e.to_string()))?;

        public_key
            .verify(input, &signature)
            .map_err(|_| SignerError::InvalidSignature)
    }
}

pub struct NativeEddsaSigner {}

impl NativeEddsaSigner {
    fn signing_key(private_key: &[u8]) -> Result<ed25519_dalek::SigningKey, SignerError> {
        match private_key.len() {
            SEED_LENGTH => {
                let seed: &[u8; SEED_LENGTH] = private_key
                    .try_into()
                    .map_err(|_| SignerError::CouldNotExtractKeyPair)?;
                Ok(ed25519_dalek::SigningKey::from_bytes(seed))
            }
            KEYPAIR_LENGTH => {
                let key_pair: &[u8; KEYPAIR_LENGTH] = private_key
                    .try_into()
                    .map_err(|_| SignerError::CouldNotExtractKeyPair)?;
                ed25519_dalek::SigningKey::from_keypair_bytes(key_pair)
                    .map_err(|_| SignerError::CouldNotExtractKeyPair)
            }
            _ => Err(SignerError::CouldNotExtractKeyPair),
        }
    }
}

impl Signer for NativeEddsaSigner {
    fn sign(
        &self,
        input: &[u8],
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SignerError> {
        let signing_key = Self::signing_key(private_key)?;

        if signing_key.verifying_key().as_bytes().as_slice() != public_key {
            return Err(SignerError::CouldNotExtractKeyPair);
        }

        Ok(signing_key.sign(input).to_bytes().to_vec())
    }

    fn verify(&self, input: &[u8], signature: &[u8], public_key: &[u8]) -> Result<(), SignerError> {
        let public_key: &[u8; 32] = public_key.try_into().map_err(|_| {
            SignerError::CouldNotExtractPublicKey("invalid public key length".to_string())
        })?;
        let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(public_key)
            .map_err(|e| SignerError::CouldNotExtractPublicKey(e.to_string()))?;

        let signature = ed25519_dalek::Signature::from_slice(signature)
            .map_err(|e| SignerError::CouldNotVerify(e.to_string()))?;

        verifying_key
            .verify(input, &signature)
            .map_err(|_| SignerError::InvalidSignature)
    }
}
