//! Seed-derived identity.
//!
//! One 32-byte seed yields an Ed25519 and a P-256 key pair together with their `did:key`
//! identifiers. Everything is derived at construction so lookups never fail on key material.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use wallet_providers::{
    common_models::did::DidValue,
    did::{imp::key::KeyDidMethod, model::DidKey, DidMethod},
    key_algorithm::{model::KeyAlgorithmType, provider::KeyAlgorithmProvider},
};
use zeroize::Zeroizing;

use crate::{
    container::{argument, method, to_value, Args, IdCapability, Plugin, Wallet},
    error::WalletError,
    model::Keypair,
};


pub const PLUGIN_NAME: &str = "did-key";

const SEED_LENGTH: usize = 32;

/// `did()` method name selecting the key of `algorithm`.
pub fn did_method_name(algorithm: KeyAlgorithmType) -> &'static str {
    match algorithm {
        KeyAlgorithmType::Eddsa => "key",
        KeyAlgorithmType::Es256 => "key:p256",
    }
}

/// Accepts `ed25519`/`eddsa` and `p256`/`secp256r1`/`es256` in any case. `None` is Ed25519.
pub fn parse_key_algorithm(algorithm: Option<&str>) -> Result<KeyAlgorithmType, WalletError> {
    let Some(algorithm) = algorithm else {
        return Ok(KeyAlgorithmType::Eddsa);
    };

    match algorithm.to_ascii_lowercase().as_str() {
        "ed25519" | "eddsa" => Ok(KeyAlgorithmType::Eddsa),
        "p256" | "p-256" | "secp256r1" | "es256" => Ok(KeyAlgorithmType::Es256),
        _ => Err(WalletError::UnsupportedAlgorithm(algorithm.to_owned())),
    }
}

fn parse_did_method(method: Option<&str>) -> Result<KeyAlgorithmType, WalletError> {
    match method {
        None | Some("key") => Ok(KeyAlgorithmType::Eddsa),
        Some("key:p256") => Ok(KeyAlgorithmType::Es256),
        Some(method) => Err(WalletError::UnsupportedDidMethod(method.to_owned())),
    }
}

/// Hex of at most 64 characters, left-padded with zeros.
fn parse_seed(seed: &str) -> Result<Zeroizing<[u8; SEED_LENGTH]>, WalletError> {
    if seed.is_empty() || seed.len() > SEED_LENGTH * 2 {
        return Err(WalletError::validation(
            "Seed must be 1 to 64 hex characters",
        ));
    }

    let padded = Zeroizing::new(format!("{seed:0>64}"));
    let mut bytes = Zeroizing::new([0u8; SEED_LENGTH]);
    hex::decode_to_slice(padded.as_str(), bytes.as_mut_slice())
        .map_err(|_| WalletError::validation("Seed must be hex encoded"))?;

    Ok(bytes)
}

struct Identity {
    did: DidValue,
    keypair: Keypair,
}

async fn derive_identity(
    key_algorithm_provider: &Arc<dyn KeyAlgorithmProvider>,
    algorithm: KeyAlgorithmType,
    seed: &[u8],
) -> Result<Identity, WalletError> {
    let key_algorithm = key_algorithm_provider
        .get_key_algorithm(&algorithm.to_string())
        .ok_or_else(|| WalletError::UnsupportedAlgorithm(algorithm.to_string()))?;

    let key = key_algorithm.key_pair_from_seed(seed)?;
    let jwk = key_algorithm.bytes_to_jwk(&key.public, None)?;
    let private_jwk = key_algorithm.private_key_as_jwk(key.private.clone())?;

    let did = KeyDidMethod::new(key_algorithm_provider.clone())
        .create(&DidKey {
            key_type: algorithm.to_string(),
            public_key: key.public.clone(),
        })
        .await?;

    Ok(Identity {
        did,
        keypair: Keypair {
            algorithm,
            public_key: key.public,
            jwk,
            private_key: key.private,
            private_jwk,
        },
    })
}

pub struct DidKeyIdentity {
    ed25519: Identity,
    p256: Identity,
}

impl DidKeyIdentity {
    fn identity(&self, algorithm: KeyAlgorithmType) -> &Identity {
        match algorithm {
            KeyAlgorithmType::Eddsa => &self.ed25519,
            KeyAlgorithmType::Es256 => &self.p256,
        }
    }
}

impl IdCapability for DidKeyIdentity {
    fn did(&self, method: Option<String>) -> Result<DidValue, WalletError> {
        let algorithm = parse_did_method(method.as_deref())?;
        Ok(self.identity(algorithm).did.clone())
    }

    fn keypair(&self, algorithm: Option<String>) -> Result<Keypair, WalletError> {
        let algorithm = parse_key_algorithm(algorithm.as_deref())?;
        Ok(self.identity(algorithm).keypair.clone())
    }
}

pub struct DidKeyPlugin {
    identity: Arc<DidKeyIdentity>,
}

impl DidKeyPlugin {
    pub async fn new(
        seed: &str,
        key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    ) -> Result<Self, WalletError> {
        let seed = parse_seed(seed)?;

        let ed25519 =
            derive_identity(&key_algorithm_provider, KeyAlgorithmType::Eddsa, seed.as_slice())
                .await?;
        let p256 =
            derive_identity(&key_algorithm_provider, KeyAlgorithmType::Es256, seed.as_slice())
                .await?;

        tracing::debug!(did = %ed25519.did, "identity derived");

        Ok(Self {
            identity: Arc::new(DidKeyIdentity { ed25519, p256 }),
        })
    }
}

#[async_trait]
impl Plugin for DidKeyPlugin {
    fn name(&self) -> String {
        PLUGIN_NAME.to_owned()
    }

    fn methods(&self) -> Vec<String> {
        vec![
            method::GET_SUBJECT_DID.to_owned(),
            method::GET_SUBJECT_KEYPAIR.to_owned(),
        ]
    }

    fn id(&self) -> Option<Arc<dyn IdCapability>> {
        Some(self.identity.clone() as Arc<dyn IdCapability>)
    }

    async fn call(&self, _wallet: &Wallet, name: &str, args: Args) -> Result<Value, WalletError> {
        match name {
            method::GET_SUBJECT_DID => {
                let did_method: Option<String> = argument(name, &args, 0)?;
                to_value(name, self.identity.did(did_method)?)
            }
            method::GET_SUBJECT_KEYPAIR => {
                let algorithm: Option<String> = argument(name, &args, 0)?;
                to_value(name, self.identity.keypair(algorithm)?.jwk)
            }
            _ => Err(WalletError::MethodNotFound(name.to_owned())),
        }
    }
}
