use serde::{Deserialize, Serialize};

/// A signing authority owned by this wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningAuthority {
    pub name: String,
    pub did: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// A signing authority registered with the network profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredSigningAuthority {
    pub endpoint: String,
    pub name: String,
    pub did: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Identifies the authority that signs claimed boosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningAuthorityEndpoint {
    pub endpoint: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did: Option<String>,
}

impl From<RegisteredSigningAuthority> for SigningAuthorityEndpoint {
    fn from(value: RegisteredSigningAuthority) -> Self {
        Self {
            endpoint: value.endpoint,
            name: value.name,
            did: Some(value.did),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimLinkOptions {
    /// Only read when generating a boost claim link; never forwarded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_authority_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_uses: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimLink {
    pub boost_uri: String,
    pub challenge: String,
}
