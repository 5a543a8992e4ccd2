//! Enumerates errors of the storage seams.

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ContentStoreError {
    #[error("Content already exists: `{0}`")]
    AlreadyExists(String),
    #[error("Content store failure: `{0}`")]
    Backend(String),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CredentialIndexError {
    #[error("Title already indexed: `{0}`")]
    DuplicateTitle(String),
    #[error("Credential index failure: `{0}`")]
    Backend(String),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum StorageUriError {
    #[error("Invalid storage uri: `{0}`")]
    Malformed(String),
    #[error("Unexpected storage uri namespace: `{0}`")]
    UnexpectedNamespace(String),
}
