use serde::{Deserialize, Serialize};

pub mod did;
pub mod macros;

/// Public JWK, tagged by `kty`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kty")]
pub enum PublicKeyJwk {
    #[serde(rename = "EC")]
    Ec(PublicKeyJwkEllipticData),
    #[serde(rename = "RSA")]
    Rsa(PublicKeyJwkRsaData),
    #[serde(rename = "OKP")]
    Okp(PublicKeyJwkEllipticData),
    #[serde(rename = "oct")]
    Oct(PublicKeyJwkOctData),
}

impl PublicKeyJwk {
    pub fn curve(&self) -> Option<&str> {
        match self {
            PublicKeyJwk::Ec(data) | PublicKeyJwk::Okp(data) => Some(data.crv.as_str()),
            PublicKeyJwk::Rsa(_) | PublicKeyJwk::Oct(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyJwkRsaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#use: Option<String>,
    pub e: String,
    pub n: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyJwkOctData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#use: Option<String>,
    pub k: String,
}

/// `EC` and `OKP` keys. `y` is absent for `OKP`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyJwkEllipticData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#use: Option<String>,
    pub crv: String,
    pub x: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}
