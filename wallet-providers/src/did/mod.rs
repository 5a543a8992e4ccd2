//! Tools for DID method operations and metadata.
//!
//! Decentralized identifiers (DIDs) are a type of globally unique identifier
//! for a resource. The DID is similar to a URL and can be resolved to a DID
//! document which offers metadata about the identified resource.
//!
//! Use this module to derive and resolve DIDs. Resolution normally goes through
//! a [`provider::DidMethodProvider`], which picks the method by the DID prefix and
//! caches resolved documents.

use async_trait::async_trait;

use crate::{
    common_models::did::DidValue,
    did::{
        error::DidMethodError,
        model::{DidDocument, DidKey},
    },
};

pub mod error;
pub mod imp;
pub mod model;
pub mod provider;

/// Performs operations on DIDs and provides DID utilities.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait DidMethod: Send + Sync {
    /// Derives the DID controlled by a key.
    async fn create(&self, key: &DidKey) -> Result<DidValue, DidMethodError>;

    /// Resolve a DID to its DID document.
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodError>;
}
