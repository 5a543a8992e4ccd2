//! Building blocks of the `ECDH-ES+XC20PKW` / `XC20P` JWE scheme.

use chacha20poly1305::{
    aead::{Aead, Payload},
    KeyInit, XChaCha20Poly1305, XNonce,
};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

pub const KEY_LENGTH: usize = 32;
pub const NONCE_LENGTH: usize = 24;
pub const TAG_LENGTH: usize = 16;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncryptionError {
    #[error("crypto error: {0}")]
    Crypto(String),
    #[error("invalid key length: {0}")]
    InvalidKeyLength(usize),
    #[error("invalid nonce length: {0}")]
    InvalidNonceLength(usize),
    #[error("key agreement produced a non-contributory secret")]
    NonContributory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedData {
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

pub struct EphemeralAgreement {
    pub ephemeral_public_key: [u8; KEY_LENGTH],
    pub shared_secret: Zeroizing<[u8; KEY_LENGTH]>,
}

fn cipher(key: &[u8]) -> Result<XChaCha20Poly1305, EncryptionError> {
    if key.len() != KEY_LENGTH {
        return Err(EncryptionError::InvalidKeyLength(key.len()));
    }
    XChaCha20Poly1305::new_from_slice(key).map_err(|err| EncryptionError::Crypto(err.to_string()))
}

fn nonce(nonce: &[u8]) -> Result<&XNonce, EncryptionError> {
    if nonce.len() != NONCE_LENGTH {
        return Err(EncryptionError::InvalidNonceLength(nonce.len()));
    }
    Ok(XNonce::from_slice(nonce))
}

fn key_array(key: &[u8]) -> Result<[u8; KEY_LENGTH], EncryptionError> {
    key.try_into()
        .map_err(|_| EncryptionError::InvalidKeyLength(key.len()))
}

/// Encrypts with XChaCha20-Poly1305 and returns the ciphertext with the detached tag.
pub fn xchacha20poly1305_seal(
    key: &[u8],
    nonce_bytes: &[u8],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<SealedData, EncryptionError> {
    let mut ciphertext = cipher(key)?
        .encrypt(
            nonce(nonce_bytes)?,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|err| EncryptionError::Crypto(err.to_string()))?;

    let tag = ciphertext.split_off(ciphertext.len() - TAG_LENGTH);

    Ok(SealedData { ciphertext, tag })
}

/// Inverse of [`xchacha20poly1305_seal`].
pub fn xchacha20poly1305_open(
    key: &[u8],
    nonce_bytes: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>, EncryptionError> {
    if tag.len() != TAG_LENGTH {
        return Err(EncryptionError::Crypto("invalid tag length".to_string()));
    }

    let combined = [ciphertext, tag].concat();

    cipher(key)?
        .decrypt(
            nonce(nonce_bytes)?,
            Payload {
                msg: &combined,
                aad,
            },
        )
        .map(Zeroizing::new)
        .map_err(|err| EncryptionError::Crypto(err.to_string()))
}

/// Agrees a secret with `recipient_public_key` using a freshly generated X25519 key.
pub fn x25519_ephemeral_agreement(
    recipient_public_key: &[u8],
) -> Result<EphemeralAgreement, EncryptionError> {
    let recipient = x25519_dalek::PublicKey::from(key_array(recipient_public_key)?);

    let secret = x25519_dalek::EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_public_key = x25519_dalek::PublicKey::from(&secret);
    let shared = secret.diffie_hellman(&recipient);

    if !shared.was_contributory() {
        return Err(EncryptionError::NonContributory);
    }

    Ok(EphemeralAgreement {
        ephemeral_public_key: ephemeral_public_key.to_bytes(),
        shared_secret: Zeroizing::new(*shared.as_bytes()),
    })
}

/// Static-static X25519 agreement, the receiving side of [`x25519_ephemeral_agreement`].
pub fn x25519_agreement(
    private_key: &[u8],
    public_key: &[u8],
) -> Result<Zeroizing<[u8; KEY_LENGTH]>, EncryptionError> {
    let secret = x25519_dalek::StaticSecret::from(*Zeroizing::new(key_array(private_key)?));
    let public = x25519_dalek::PublicKey::from(key_array(public_key)?);

    let shared = secret.diffie_hellman(&public);
    if !shared.was_contributory() {
        return Err(EncryptionError::NonContributory);
    }

    Ok(Zeroizing::new(*shared.as_bytes()))
}

/// JOSE Concat KDF (RFC 7518 section 4.6.2) with SHA-256 and empty party info.
///
/// Only a single round is implemented, enough for keys up to 256 bits.
pub fn concat_kdf_sha256(
    shared_secret: &[u8],
    algorithm: &str,
    key_length_bits: u32,
) -> Result<Zeroizing<Vec<u8>>, EncryptionError> {
    if key_length_bits == 0 || key_length_bits > 256 {
        return Err(EncryptionError::InvalidKeyLength(
            key_length_bits as usize / 8,
        ));
    }

    let mut hasher = Sha256::new();
    hasher.update(1u32.to_be_bytes());
    hasher.update(shared_secret);
    hasher.update((algorithm.len() as u32).to_be_bytes());
    hasher.update(algorithm.as_bytes());
    // PartyUInfo and PartyVInfo, both empty
    hasher.update(0u32.to_be_bytes());
    hasher.update(0u32.to_be_bytes());
    hasher.update(key_length_bits.to_be_bytes());

    let digest = hasher.finalize();
    Ok(Zeroizing::new(
        digest[..(key_length_bits / 8) as usize].to_vec(),
    ))
}
