use serde_json::{json, Value};

use crate::{config::WalletConfig, init_wallet, Wallet, WalletServices};

pub const SEED: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const OTHER_SEED: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const THIRD_SEED: &str = "cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";

pub const CREATED: &str = "2024-01-01T00:00:00Z";

pub async fn wallet(seed: &str) -> Wallet {
    wallet_with_config(seed, &WalletConfig::default()).await
}

pub async fn wallet_with_config(seed: &str, config: &WalletConfig) -> Wallet {
    init_wallet(seed, config, WalletServices::default())
        .await
        .unwrap()
}

/// VCDM 1.1 credential without issuer.
pub fn unsigned_credential(subject: &str) -> Value {
    json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "id": "http://example.org/credentials/3731",
        "type": ["VerifiableCredential"],
        "issuanceDate": "2020-08-19T21:41:50Z",
        "credentialSubject": { "id": subject }
    })
}

pub fn unsigned_presentation(credentials: Vec<Value>) -> Value {
    json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "type": ["VerifiablePresentation"],
        "verifiableCredential": credentials
    })
}
