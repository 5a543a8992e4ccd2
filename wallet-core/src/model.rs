use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use wallet_providers::{common_models::PublicKeyJwk, key_algorithm::model::KeyAlgorithmType};
use zeroize::Zeroizing;

pub const CHECK_PROOF: &str = "proof";
pub const CHECK_JWS: &str = "JWS";
pub const CHECK_EXPIRATION: &str = "expiration";

#[derive(Debug, Copy, Clone, Default, Display, EnumString, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProofFormat {
    #[default]
    Ldp,
    Jwt,
}

/// Ed25519 engine registered under the `Ed25519` signer id.
#[derive(Debug, Copy, Clone, Default, Display, EnumString, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SigningEngine {
    #[default]
    Portable,
    Native,
}

/// Outcome of a credential or presentation verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCheck {
    pub checks: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl VerificationCheck {
    /// No errors and at least one proof check passed. Warnings do not count.
    pub fn is_verified(&self) -> bool {
        self.errors.is_empty()
            && self
                .checks
                .iter()
                .any(|check| check == CHECK_PROOF || check == CHECK_JWS)
    }

    pub(crate) fn error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub(crate) fn check(&mut self, check: &str) {
        self.checks.push(check.to_owned());
    }

    pub(crate) fn failed(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            ..Default::default()
        }
    }
}

/// Key pair derived from the wallet seed.
#[derive(Clone)]
pub struct Keypair {
    pub algorithm: KeyAlgorithmType,
    pub public_key: Vec<u8>,
    pub jwk: PublicKeyJwk,
    pub(crate) private_key: Zeroizing<Vec<u8>>,
    pub(crate) private_jwk: Zeroizing<String>,
}

impl Keypair {
    /// Full JWK including the private `d` parameter.
    pub fn private_key_jwk(&self) -> Zeroizing<String> {
        self.private_jwk.clone()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("algorithm", &self.algorithm)
            .field("jwk", &self.jwk)
            .field("private_key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_format: Option<ProofFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<String>,
    /// RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub check_credentials: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad: Option<String>,
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_is_verified_policy() {
        let mut check = VerificationCheck::default();
        assert!(!check.is_verified());

        check.check(CHECK_EXPIRATION);
        assert!(!check.is_verified());

        check.check(CHECK_JWS);
        check.warnings.push("informational".to_string());
        assert!(check.is_verified());

        check.error("expiration error: Credential is expired");
        assert!(!check.is_verified());
    }

    #[test]
    fn test_enum_names() {
        assert_eq!("ldp", ProofFormat::Ldp.to_string());
        assert_eq!(SigningEngine::Native, SigningEngine::from_str("native").unwrap());
        assert_eq!(
            ProofFormat::Jwt,
            serde_json::from_value::<ProofFormat>(serde_json::json!("jwt")).unwrap()
        );
    }

    #[test]
    fn test_signing_options_camel_case() {
        let options: SigningOptions = serde_json::from_value(serde_json::json!({
            "proofFormat": "jwt",
            "proofPurpose": "authentication",
            "keyAlgorithm": "p256"
        }))
        .unwrap();

        assert_eq!(Some(ProofFormat::Jwt), options.proof_format);
        assert_eq!(Some("authentication"), options.proof_purpose.as_deref());
        assert_eq!(Some("p256"), options.key_algorithm.as_deref());
    }
}
