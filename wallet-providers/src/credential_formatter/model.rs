//! Signing and verification seams used by the proof formats.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wallet_crypto::SignerError;

use crate::common_models::did::DidValue;

pub type AuthenticationFn = Box<dyn SignatureProvider>;

/// Method for verifying a signature against the signer's published key.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// `algorithm` is the JOSE name (`EdDSA`, `ES256`).
    async fn verify<'a>(
        &self,
        issuer_did_value: Option<DidValue>,
        issuer_key_id: Option<&'a str>,
        algorithm: &'a str,
        token: &'a [u8],
        signature: &'a [u8],
    ) -> Result<(), SignerError>;
}

/// Method for signing with a private key without exposing it.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SignatureProvider: Send + Sync {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;
    fn get_key_id(&self) -> Option<String>;
    fn get_public_key(&self) -> Vec<u8>;
}

/// `issuer` or `holder` of a credential, either a plain id or an object with `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Issuer {
    Url(String),
    Object(IssuerObject),
}

impl Issuer {
    pub fn id(&self) -> &str {
        match self {
            Issuer::Object(object) => &object.id,
            Issuer::Url(s) => s,
        }
    }

    /// Reads `field` of a JSON object as an issuer reference.
    pub fn from_field(document: &serde_json::Value, field: &str) -> Option<Self> {
        serde_json::from_value(document.get(field)?.clone()).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerObject {
    pub id: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}
