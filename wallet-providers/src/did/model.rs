//! `struct`s and `enum`s for DID method provider.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::{
    common_models::{
        did::{DidValue, KeyRole},
        PublicKeyJwk,
    },
    did::error::DidMethodError,
    key_algorithm::{
        imp::{
            eddsa::{x25519_jwk, Eddsa},
            es256::Es256,
        },
        KeyAlgorithm,
    },
};

#[derive(Clone, Debug, Default)]
pub struct DidKey {
    pub key_type: String,
    pub public_key: Vec<u8>,
}

/// W3C DID document. Unknown members are kept in `rest`.
///
/// Verification methods and relationship entries that cannot be read are dropped instead of
/// failing the whole document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context")]
    pub context: serde_json::Value,
    pub id: DidValue,
    #[serde(default, deserialize_with = "readable_entries")]
    pub verification_method: Vec<DidVerificationMethod>,
    #[serde(
        default,
        deserialize_with = "readable_relationship",
        skip_serializing_if = "Option::is_none"
    )]
    pub authentication: Option<Vec<DidRelationshipEntry>>,
    #[serde(
        default,
        deserialize_with = "readable_relationship",
        skip_serializing_if = "Option::is_none"
    )]
    pub assertion_method: Option<Vec<DidRelationshipEntry>>,
    #[serde(
        default,
        deserialize_with = "readable_relationship",
        skip_serializing_if = "Option::is_none"
    )]
    pub key_agreement: Option<Vec<DidRelationshipEntry>>,
    #[serde(
        default,
        deserialize_with = "readable_relationship",
        skip_serializing_if = "Option::is_none"
    )]
    pub capability_invocation: Option<Vec<DidRelationshipEntry>>,
    #[serde(
        default,
        deserialize_with = "readable_relationship",
        skip_serializing_if = "Option::is_none"
    )]
    pub capability_delegation: Option<Vec<DidRelationshipEntry>>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// A relationship lists a method either by id or embedded in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DidRelationshipEntry {
    Reference(String),
    Embedded(DidVerificationMethod),
}

impl From<String> for DidRelationshipEntry {
    fn from(id: String) -> Self {
        Self::Reference(id)
    }
}

impl DidRelationshipEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::Reference(id) => id,
            Self::Embedded(method) => &method.id,
        }
    }
}

/// Public key in one of `publicKeyJwk`, `publicKeyMultibase` or `publicKeyBase58`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidVerificationMethod {
    pub id: String,
    pub r#type: String,
    pub controller: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<PublicKeyJwk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_multibase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_base58: Option<String>,
}

impl DidVerificationMethod {
    pub fn from_jwk(id: String, r#type: &str, controller: String, jwk: PublicKeyJwk) -> Self {
        Self {
            id,
            r#type: r#type.to_owned(),
            controller,
            public_key_jwk: Some(jwk),
            public_key_multibase: None,
            public_key_base58: None,
        }
    }

    /// The public key as JWK, converted from multibase or base58 when needed.
    ///
    /// Multibase keys carry a multicodec prefix (Ed25519, X25519 or compressed P-256). Raw
    /// base58 and unprefixed multibase keys are typed by the method type.
    pub fn jwk(&self) -> Result<PublicKeyJwk, DidMethodError> {
        if let Some(jwk) = &self.public_key_jwk {
            return Ok(jwk.clone());
        }

        let unreadable =
            |reason: String| DidMethodError::UnsupportedKey(format!("`{}`: {reason}", self.id));

        let bytes = match (&self.public_key_multibase, &self.public_key_base58) {
            (Some(multibase), _) => multibase
                .strip_prefix('z')
                .ok_or_else(|| unreadable("only base58btc multibase is supported".to_owned()))
                .and_then(|encoded| {
                    bs58::decode(encoded)
                        .into_vec()
                        .map_err(|e| unreadable(e.to_string()))
                })?,
            (None, Some(base58)) => bs58::decode(base58)
                .into_vec()
                .map_err(|e| unreadable(e.to_string()))?,
            (None, None) => return Err(unreadable("no public key".to_owned())),
        };

        let (key_type, key) = RawKeyType::detect(&self.r#type, &bytes)
            .ok_or_else(|| unreadable(format!("unsupported key of type {}", self.r#type)))?;

        match key_type {
            RawKeyType::Ed25519 => Eddsa.bytes_to_jwk(key, None),
            RawKeyType::X25519 => x25519_jwk(key),
            RawKeyType::P256 => Es256.bytes_to_jwk(key, None),
        }
        .map_err(|e| unreadable(e.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RawKeyType {
    Ed25519,
    X25519,
    P256,
}

impl RawKeyType {
    const PREFIXED: [(RawKeyType, [u8; 2], usize); 3] = [
        (RawKeyType::Ed25519, [0xed, 0x01], 32),
        (RawKeyType::X25519, [0xec, 0x01], 32),
        (RawKeyType::P256, [0x80, 0x24], 33),
    ];

    fn detect<'a>(method_type: &str, bytes: &'a [u8]) -> Option<(Self, &'a [u8])> {
        let prefixed = Self::PREFIXED.iter().find_map(|(key_type, codec, length)| {
            bytes
                .strip_prefix(codec.as_slice())
                .filter(|key| key.len() == *length)
                .map(|key| (*key_type, key))
        });
        if prefixed.is_some() {
            return prefixed;
        }

        let key_type = match method_type {
            "Ed25519VerificationKey2018" | "Ed25519VerificationKey2020" => RawKeyType::Ed25519,
            "X25519KeyAgreementKey2019" | "X25519KeyAgreementKey2020" => RawKeyType::X25519,
            "EcdsaSecp256r1VerificationKey2019" => RawKeyType::P256,
            _ => return None,
        };
        let length = match key_type {
            RawKeyType::P256 => 33,
            _ => 32,
        };

        (bytes.len() == length).then_some((key_type, bytes))
    }
}

fn readable<T: DeserializeOwned>(values: Vec<serde_json::Value>) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| {
            serde_json::from_value(value)
                .inspect_err(|error| {
                    tracing::debug!(%error, "skipping unreadable verification method");
                })
                .ok()
        })
        .collect()
}

fn readable_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<DidVerificationMethod>, D::Error> {
    Vec::deserialize(deserializer).map(readable)
}

fn readable_relationship<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<DidRelationshipEntry>>, D::Error> {
    Option::<Vec<serde_json::Value>>::deserialize(deserializer).map(|values| values.map(readable))
}

impl DidDocument {
    /// Verification method ids listed under a relationship, made absolute.
    pub fn relationship(&self, role: KeyRole) -> Vec<String> {
        let ids = match role {
            KeyRole::Authentication => &self.authentication,
            KeyRole::AssertionMethod => &self.assertion_method,
            KeyRole::KeyAgreement => &self.key_agreement,
            KeyRole::CapabilityInvocation => &self.capability_invocation,
            KeyRole::CapabilityDelegation => &self.capability_delegation,
        };

        ids.iter()
            .flatten()
            .map(|entry| self.absolute_id(entry.id()))
            .collect()
    }

    /// Looks in `verificationMethod` first, then at methods embedded in relationships.
    pub fn find_verification_method(&self, id: &str) -> Option<&DidVerificationMethod> {
        let id = self.absolute_id(id);

        let embedded = [
            &self.authentication,
            &self.assertion_method,
            &self.key_agreement,
            &self.capability_invocation,
            &self.capability_delegation,
        ]
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(|entry| match entry {
            DidRelationshipEntry::Embedded(method) => Some(method),
            DidRelationshipEntry::Reference(_) => None,
        });

        self.verification_method
            .iter()
            .chain(embedded)
            .find(|method| self.absolute_id(&method.id) == id)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Resolves a relative `#fragment` id against the document id.
    pub fn absolute_id(&self, id: &str) -> String {
        if id.starts_with('#') {
            format!("{}{id}", self.id)
        } else {
            id.to_owned()
        }
    }
}
