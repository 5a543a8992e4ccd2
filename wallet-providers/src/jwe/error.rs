//! Enumerates errors of the JWE envelope.

use thiserror::Error;
use wallet_crypto::imp::encryption::EncryptionError;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum JweError {
    #[error("No recipients")]
    NoRecipients,
    #[error("Missing key agreement key: `{0}`")]
    MissingKeyAgreementKey(String),
    #[error("Invalid recipient key: `{0}`")]
    InvalidRecipientKey(String),
    #[error("Could not encrypt: `{0}`")]
    CouldNotEncrypt(String),
    #[error("Encryption error: `{0}`")]
    Encryption(#[from] EncryptionError),
    /// Carries no detail so callers cannot tell a wrong key from tampered data.
    #[error("Could not decrypt")]
    DecryptionFailed,
}
