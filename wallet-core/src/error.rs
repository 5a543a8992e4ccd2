//! Error taxonomy of the wallet.
//!
//! Provider errors are mapped into [`WalletError`] at the plugin boundary. Verification
//! outcomes are never errors, they are reported through
//! [`VerificationCheck`](crate::model::VerificationCheck).

use thiserror::Error;
use wallet_crypto::{
    imp::encryption::EncryptionError, CryptoProviderError, HasherError, SignerError,
};
use wallet_providers::{
    cache_storage::CacheStorageError,
    credential_formatter::error::FormatterError,
    did::error::{DidMethodError, DidMethodProviderError},
    jwe::error::JweError,
    key_algorithm::error::KeyAlgorithmError,
    storage::error::{ContentStoreError, CredentialIndexError, StorageUriError},
};

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Validation error: `{}`", .0.join("; "))]
    Validation(Vec<String>),
    #[error("Could not sign: `{0}`")]
    Signature(String),
    #[error("Could not resolve `{did}`: `{reason}`")]
    Resolution { did: String, reason: String },
    #[error("Could not decrypt")]
    Decryption,
    #[error("Could not encrypt: `{0}`")]
    Encryption(String),
    #[error("Unsupported did method: `{0}`")]
    UnsupportedDidMethod(String),
    #[error("Unsupported algorithm: `{0}`")]
    UnsupportedAlgorithm(String),
    #[error("Network error: `{0}`")]
    Network(String),
    #[error("Not found: `{0}`")]
    NotFound(String),
    #[error("Plugin `{plugin}` depends on missing method `{method}`")]
    MissingDependency { plugin: String, method: String },
    #[error("Plugin already added: `{0}`")]
    DuplicatePlugin(String),
    #[error("Method not found: `{0}`")]
    MethodNotFound(String),
    #[error("Wallet has no identity")]
    MissingIdentity,
    #[error("Invalid arguments for `{method}`: `{reason}`")]
    InvalidArguments { method: String, reason: String },
    #[error("Storage error: `{0}`")]
    Storage(String),
    #[error("External service error: `{0}`")]
    External(String),
}

impl WalletError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Resolution { .. } | Self::Network(_))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Maps a resolution failure of `did`, keeping unknown methods distinguishable.
    pub fn resolution(did: &str, error: DidMethodProviderError) -> Self {
        match error {
            DidMethodProviderError::MissingProvider(method) => {
                Self::UnsupportedDidMethod(method.to_lowercase())
            }
            DidMethodProviderError::MissingDidMethodNameInDidValue => {
                Self::validation(format!("Invalid did: `{did}`"))
            }
            error => Self::Resolution {
                did: did.to_owned(),
                reason: error.to_string(),
            },
        }
    }
}

impl From<DidMethodProviderError> for WalletError {
    fn from(error: DidMethodProviderError) -> Self {
        let did = match &error {
            DidMethodProviderError::DocumentIdMismatch { requested, .. } => requested.to_owned(),
            _ => String::new(),
        };
        Self::resolution(&did, error)
    }
}

impl From<DidMethodError> for WalletError {
    fn from(error: DidMethodError) -> Self {
        match error {
            DidMethodError::KeyAlgorithmNotFound => Self::UnsupportedAlgorithm(error.to_string()),
            DidMethodError::NotSupported => Self::UnsupportedDidMethod(error.to_string()),
            error => Self::Resolution {
                did: String::new(),
                reason: error.to_string(),
            },
        }
    }
}

impl From<FormatterError> for WalletError {
    fn from(error: FormatterError) -> Self {
        Self::Signature(error.to_string())
    }
}

impl From<SignerError> for WalletError {
    fn from(error: SignerError) -> Self {
        Self::Signature(error.to_string())
    }
}

impl From<HasherError> for WalletError {
    fn from(error: HasherError) -> Self {
        Self::Signature(error.to_string())
    }
}

impl From<CryptoProviderError> for WalletError {
    fn from(error: CryptoProviderError) -> Self {
        Self::UnsupportedAlgorithm(error.to_string())
    }
}

impl From<KeyAlgorithmError> for WalletError {
    fn from(error: KeyAlgorithmError) -> Self {
        Self::Signature(error.to_string())
    }
}

impl From<EncryptionError> for WalletError {
    fn from(error: EncryptionError) -> Self {
        Self::Encryption(error.to_string())
    }
}

impl From<JweError> for WalletError {
    fn from(error: JweError) -> Self {
        match error {
            JweError::DecryptionFailed => Self::Decryption,
            JweError::NoRecipients => Self::validation(error.to_string()),
            // the recipient's document resolved, it just has no usable key
            error => Self::Encryption(error.to_string()),
        }
    }
}

impl From<ContentStoreError> for WalletError {
    fn from(error: ContentStoreError) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<CredentialIndexError> for WalletError {
    fn from(error: CredentialIndexError) -> Self {
        match error {
            CredentialIndexError::DuplicateTitle(_) => Self::validation(error.to_string()),
            CredentialIndexError::Backend(_) => Self::Storage(error.to_string()),
        }
    }
}

impl From<StorageUriError> for WalletError {
    fn from(error: StorageUriError) -> Self {
        Self::validation(error.to_string())
    }
}

impl From<CacheStorageError> for WalletError {
    fn from(error: CacheStorageError) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}
