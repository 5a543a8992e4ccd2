use std::fmt;

use strum::{Display, EnumString};
use zeroize::Zeroizing;

#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedKey {
    pub public: Vec<u8>,
    pub private: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for GeneratedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedKey")
            .field("public", &self.public)
            .field("private", &"***")
            .finish()
    }
}

/// Key algorithms known to the wallet, by provider id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
pub enum KeyAlgorithmType {
    #[strum(serialize = "EDDSA")]
    Eddsa,
    #[strum(serialize = "ES256")]
    Es256,
}

impl KeyAlgorithmType {
    /// JOSE `alg` header value.
    pub fn jose_alg(&self) -> &'static str {
        match self {
            KeyAlgorithmType::Eddsa => "EdDSA",
            KeyAlgorithmType::Es256 => "ES256",
        }
    }

    pub fn from_jose_alg(alg: &str) -> Option<Self> {
        match alg {
            "EdDSA" | "Ed25519" => Some(KeyAlgorithmType::Eddsa),
            "ES256" => Some(KeyAlgorithmType::Es256),
            _ => None,
        }
    }

    /// Data Integrity cryptosuite using JCS canonicalization.
    pub fn cryptosuite(&self) -> &'static str {
        match self {
            KeyAlgorithmType::Eddsa => "eddsa-jcs-2022",
            KeyAlgorithmType::Es256 => "ecdsa-jcs-2019",
        }
    }

    pub fn from_cryptosuite(cryptosuite: &str) -> Option<Self> {
        match cryptosuite {
            "eddsa-jcs-2022" => Some(KeyAlgorithmType::Eddsa),
            "ecdsa-jcs-2019" => Some(KeyAlgorithmType::Es256),
            _ => None,
        }
    }
}
