//! Enumerates errors related to DID method provider.

use thiserror::Error;

use crate::cache_storage::CacheStorageError;

#[derive(Debug, Error)]
pub enum DidMethodError {
    #[error("Key algorithm not found")]
    KeyAlgorithmNotFound,
    #[error("Could not resolve: `{0}`")]
    ResolutionError(String),
    #[error("Could not create: `{0}`")]
    CouldNotCreate(String),
    #[error("Unsupported verification key: {0}")]
    UnsupportedKey(String),
    #[error("Not supported")]
    NotSupported,
}

#[derive(Debug, Error)]
pub enum DidMethodProviderError {
    #[error("Did method error: `{0}`")]
    DidMethod(#[from] DidMethodError),
    #[error("Resolved document `{resolved}` does not match requested did `{requested}`")]
    DocumentIdMismatch { requested: String, resolved: String },
    #[error("Missing did method name in did value")]
    MissingDidMethodNameInDidValue,
    #[error("Missing did provider: `{0}`")]
    MissingProvider(String),

    #[error("JSON parse error: `{0}`")]
    JsonParse(#[from] serde_json::Error),
    #[error("Cache storage error: `{0}`")]
    CacheStorage(#[from] CacheStorageError),
}
