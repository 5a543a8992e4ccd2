use serde::{Deserialize, Serialize};

use crate::common_models::PublicKeyJwk;

pub const CONTENT_ENCRYPTION: &str = "XC20P";
pub const KEY_WRAPPING: &str = "ECDH-ES+XC20PKW";

/// JWE in general JSON serialization, all binary members base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwe {
    pub protected: String,
    pub iv: String,
    pub ciphertext: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad: Option<String>,
    pub recipients: Vec<JweRecipient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JweRecipient {
    pub encrypted_key: String,
    pub header: JweRecipientHeader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JweRecipientHeader {
    pub alg: String,
    pub iv: String,
    pub tag: String,
    pub epk: PublicKeyJwk,
    pub kid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JweProtectedHeader {
    pub enc: String,
}

/// X25519 key agreement key of one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientKey {
    pub kid: String,
    pub public_key: Vec<u8>,
}
