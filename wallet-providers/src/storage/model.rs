use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageUriError;

pub const DEFAULT_NAMESPACE: &str = "lc";
pub const CREDENTIAL_RESOURCE: &str = "credential";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub title: String,
    pub uri: String,
}

/// `<namespace>:<resourceType>:<id>`, e.g. `lc:credential:<uuid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageUri {
    pub namespace: String,
    pub resource_type: String,
    pub id: String,
}

impl StorageUri {
    /// Mints a fresh URI with a random v4 id.
    pub fn new(namespace: &str, resource_type: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            resource_type: resource_type.to_owned(),
            id: Uuid::new_v4().to_string(),
        }
    }

    pub fn parse(uri: &str, expected_namespace: &str) -> Result<Self, StorageUriError> {
        let mut parts = uri.splitn(3, ':');

        let (Some(namespace), Some(resource_type), Some(id)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(StorageUriError::Malformed(uri.to_owned()));
        };

        if [namespace, resource_type, id].iter().any(|part| part.is_empty()) {
            return Err(StorageUriError::Malformed(uri.to_owned()));
        }

        if namespace != expected_namespace {
            return Err(StorageUriError::UnexpectedNamespace(namespace.to_owned()));
        }

        Ok(Self {
            namespace: namespace.to_owned(),
            resource_type: resource_type.to_owned(),
            id: id.to_owned(),
        })
    }
}

impl fmt::Display for StorageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.resource_type, self.id)
    }
}
