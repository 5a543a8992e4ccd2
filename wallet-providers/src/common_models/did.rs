use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::common_models::macros::{impl_display, impl_from, impl_into};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DidValue(String);
impl_display!(DidValue);
impl_from!(DidValue; String);
impl_into!(DidValue; String);

impl DidValue {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The method segment, `key` for `did:key:z6Mk...`.
    pub fn method(&self) -> Option<&str> {
        let mut parts = self.0.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("did"), Some(method), Some(_)) if !method.is_empty() => Some(method),
            _ => None,
        }
    }

    /// Splits a DID URL such as a verification method id into the DID and its fragment.
    pub fn from_did_url(did_url: &str) -> Self {
        let did = did_url
            .split_once('#')
            .map(|(did, _)| did)
            .unwrap_or(did_url);
        Self(did.to_owned())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum KeyRole {
    Authentication,
    AssertionMethod,
    KeyAgreement,
    CapabilityInvocation,
    CapabilityDelegation,
}
