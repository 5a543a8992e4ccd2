use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::key_algorithm::model::KeyAlgorithmType;

pub const DATA_INTEGRITY_PROOF: &str = "DataIntegrityProof";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataIntegrityProof {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    pub r#type: String,
    pub cryptosuite: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    pub verification_method: String,
    pub proof_purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProofOptions {
    pub algorithm: KeyAlgorithmType,
    pub verification_method: String,
    pub proof_purpose: String,
    pub created: OffsetDateTime,
    pub challenge: Option<String>,
    pub domain: Option<String>,
}
