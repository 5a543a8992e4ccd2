use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use ed25519_compact::{KeyPair, PublicKey, Seed};
use wallet_crypto::SignerError;
use zeroize::Zeroizing;

use crate::{
    common_models::{PublicKeyJwk, PublicKeyJwkEllipticData},
    key_algorithm::{error::KeyAlgorithmError, model::GeneratedKey, KeyAlgorithm},
};

#[cfg(test)]
mod test;

const ED25519_MULTICODEC: [u8; 2] = [0xed, 0x01];
const X25519_MULTICODEC: [u8; 2] = [0xec, 0x01];

pub struct Eddsa;

impl KeyAlgorithm for Eddsa {
    fn get_signer_algorithm_id(&self) -> String {
        "Ed25519".to_string()
    }

    fn get_multibase(&self, public_key: &[u8]) -> Result<String, KeyAlgorithmError> {
        let key = PublicKey::from_slice(public_key).map_err(|_| SignerError::MissingKey)?;
        Ok(multibase(&ED25519_MULTICODEC, key.as_ref()))
    }

    fn key_pair_from_seed(&self, seed: &[u8]) -> Result<GeneratedKey, KeyAlgorithmError> {
        let seed = Seed::from_slice(seed)
            .map_err(|_| KeyAlgorithmError::Failed("Invalid Ed25519 seed".to_string()))?;
        Ok(key_pair_from_seed(seed))
    }

    fn bytes_to_jwk(
        &self,
        bytes: &[u8],
        r#use: Option<String>,
    ) -> Result<PublicKeyJwk, KeyAlgorithmError> {
        okp_jwk("Ed25519", bytes, r#use)
    }

    fn jwk_to_bytes(&self, jwk: &PublicKeyJwk) -> Result<Vec<u8>, KeyAlgorithmError> {
        match jwk {
            PublicKeyJwk::Okp(data) if data.crv == "Ed25519" => {
                Base64UrlSafeNoPadding::decode_to_vec(&data.x, None)
                    .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))
            }
            _ => Err(KeyAlgorithmError::Failed("invalid kty".to_string())),
        }
    }

    fn private_key_as_jwk(
        &self,
        secret_key: Zeroizing<Vec<u8>>,
    ) -> Result<Zeroizing<String>, KeyAlgorithmError> {
        // automatically gets zeroized when dropped
        let secret_key = secret_key_from_bytes(&secret_key)?;
        let public_key = secret_key.public_key();

        let x = Base64UrlSafeNoPadding::encode_to_string(public_key.as_slice())
            .map_err(|err| KeyAlgorithmError::Failed(err.to_string()))?;

        let d = Base64UrlSafeNoPadding::encode_to_string(secret_key.seed().as_slice())
            .map(Zeroizing::new)
            .map_err(|err| KeyAlgorithmError::Failed(err.to_string()))?;

        let jwk = serde_json::json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "x": x,
            "d": d.as_str(),
        })
        .to_string();

        Ok(Zeroizing::new(jwk))
    }
}

fn key_pair_from_seed(seed: Seed) -> GeneratedKey {
    let key_pair = KeyPair::from_seed(seed);

    GeneratedKey {
        public: key_pair.pk.to_vec(),
        private: Zeroizing::new(key_pair.sk.to_vec()),
    }
}

/// Accepts both the 32-byte seed and the 64-byte `seed || public` form.
fn secret_key_from_bytes(
    secret_key: &[u8],
) -> Result<ed25519_compact::SecretKey, KeyAlgorithmError> {
    match secret_key.len() {
        Seed::BYTES => Seed::from_slice(secret_key)
            .map(|seed| KeyPair::from_seed(seed).sk)
            .map_err(|_| KeyAlgorithmError::Failed("Invalid secret key".to_string())),
        _ => ed25519_compact::SecretKey::from_slice(secret_key)
            .map_err(|_| KeyAlgorithmError::Failed("Invalid secret key".to_string())),
    }
}

fn multibase(codec: &[u8], key: &[u8]) -> String {
    let data = [codec, key].concat();
    format!("z{}", bs58::encode(data).into_string())
}

fn okp_jwk(
    crv: &str,
    bytes: &[u8],
    r#use: Option<String>,
) -> Result<PublicKeyJwk, KeyAlgorithmError> {
    Ok(PublicKeyJwk::Okp(PublicKeyJwkEllipticData {
        r#use,
        crv: crv.to_string(),
        x: Base64UrlSafeNoPadding::encode_to_string(bytes)
            .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?,
        y: None,
    }))
}

/// Birationally maps an Ed25519 public key to its X25519 (Montgomery) form.
pub fn ed25519_public_key_to_x25519(public_key: &[u8]) -> Result<Vec<u8>, anyhow::Error> {
    let key = PublicKey::from_slice(public_key)?;
    let key = ed25519_compact::x25519::PublicKey::from_ed25519(&key)?;
    Ok(key.as_slice().to_vec())
}

/// X25519 secret matching [`ed25519_public_key_to_x25519`] of the same key-pair.
pub fn ed25519_private_key_to_x25519(
    private_key: &[u8],
) -> Result<Zeroizing<Vec<u8>>, anyhow::Error> {
    let key = secret_key_from_bytes(private_key)?;
    let key = ed25519_compact::x25519::SecretKey::from_ed25519(&key)?;
    Ok(Zeroizing::new(key.as_slice().to_vec()))
}

/// `z6LS...` multibase of an X25519 public key.
pub fn x25519_multibase(public_key: &[u8]) -> String {
    multibase(&X25519_MULTICODEC, public_key)
}

pub fn x25519_jwk(public_key: &[u8]) -> Result<PublicKeyJwk, KeyAlgorithmError> {
    okp_jwk("X25519", public_key, None)
}

/// Raw X25519 public key from an `OKP`/`X25519` JWK.
pub fn x25519_jwk_to_bytes(jwk: &PublicKeyJwk) -> Option<Vec<u8>> {
    match jwk {
        PublicKeyJwk::Okp(data) if data.crv == "X25519" => {
            Base64UrlSafeNoPadding::decode_to_vec(&data.x, None)
                .ok()
                .filter(|key| key.len() == 32)
        }
        _ => None,
    }
}
