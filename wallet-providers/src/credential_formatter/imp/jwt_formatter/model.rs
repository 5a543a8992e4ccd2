use serde::{Deserialize, Serialize};

pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// VC-JWT custom claims.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VC {
    pub vc: JsonObject,
}

/// VP-JWT custom claims.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VP {
    pub vp: JsonObject,
}

#[derive(Debug, Default, Clone)]
pub struct PresentationJwtOptions {
    pub challenge: Option<String>,
    pub domain: Option<String>,
}
