use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use p256::elliptic_curve::{
    generic_array::GenericArray,
    sec1::{EncodedPoint, ToEncodedPoint},
};
use wallet_crypto::imp::signer::es256::ES256Signer;
use zeroize::Zeroizing;

use crate::{
    common_models::{PublicKeyJwk, PublicKeyJwkEllipticData},
    key_algorithm::{error::KeyAlgorithmError, model::GeneratedKey, KeyAlgorithm},
};


const P256_MULTICODEC: [u8; 2] = [0x80, 0x24];
const COORDINATE_LENGTH: usize = 32;

pub struct Es256;

impl KeyAlgorithm for Es256 {
    fn get_signer_algorithm_id(&self) -> String {
        "ES256".to_string()
    }

    fn get_multibase(&self, public_key: &[u8]) -> Result<String, KeyAlgorithmError> {
        let key = ES256Signer::compress_public_key(public_key)?;
        let data = [P256_MULTICODEC.as_slice(), key.as_slice()].concat();
        Ok(format!("z{}", bs58::encode(data).into_string()))
    }

    fn key_pair_from_seed(&self, seed: &[u8]) -> Result<GeneratedKey, KeyAlgorithmError> {
        let secret_key = p256::SecretKey::from_slice(seed)
            .map_err(|e| KeyAlgorithmError::Failed(format!("Invalid P-256 seed: {e}")))?;

        Ok(GeneratedKey {
            public: secret_key
                .public_key()
                .to_encoded_point(true)
                .as_bytes()
                .to_vec(),
            private: Zeroizing::new(secret_key.to_bytes().to_vec()),
        })
    }

    fn bytes_to_jwk(
        &self,
        bytes: &[u8],
        r#use: Option<String>,
    ) -> Result<PublicKeyJwk, KeyAlgorithmError> {
        let pk = p256::PublicKey::from_sec1_bytes(bytes)
            .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?;
        let encoded_point = pk.to_encoded_point(false);
        let x = encoded_point
            .x()
            .ok_or(KeyAlgorithmError::Failed("X is missing".to_string()))?;
        let y = encoded_point
            .y()
            .ok_or(KeyAlgorithmError::Failed("Y is missing".to_string()))?;
        Ok(PublicKeyJwk::Ec(PublicKeyJwkEllipticData {
            r#use,
            crv: "P-256".to_string(),
            x: Base64UrlSafeNoPadding::encode_to_string(x)
                .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?,
            y: Some(
                Base64UrlSafeNoPadding::encode_to_string(y)
                    .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?,
            ),
        }))
    }

    fn jwk_to_bytes(&self, jwk: &PublicKeyJwk) -> Result<Vec<u8>, KeyAlgorithmError> {
        let PublicKeyJwk::Ec(data) = jwk else {
            return Err(KeyAlgorithmError::Failed("invalid kty".to_string()));
        };
        if data.crv != "P-256" {
            return Err(KeyAlgorithmError::Failed(format!(
                "invalid crv: {}",
                data.crv
            )));
        }

        let x = decode_coordinate(&data.x)?;
        let y = decode_coordinate(
            data.y
                .as_ref()
                .ok_or(KeyAlgorithmError::Failed("Y is missing".to_string()))?,
        )?;

        let encoded_point = EncodedPoint::<p256::NistP256>::from_affine_coordinates(
            GenericArray::from_slice(&x),
            GenericArray::from_slice(&y),
            true,
        );

        Ok(encoded_point.as_bytes().to_owned())
    }

    fn private_key_as_jwk(
        &self,
        secret_key: Zeroizing<Vec<u8>>,
    ) -> Result<Zeroizing<String>, KeyAlgorithmError> {
        let secret_key = p256::SecretKey::from_slice(&secret_key).map_err(|err| {
            KeyAlgorithmError::Failed(format!("Failed parsing key from bytes {err}"))
        })?;

        Ok(secret_key.to_jwk_string())
    }
}

fn decode_coordinate(value: &str) -> Result<Vec<u8>, KeyAlgorithmError> {
    let coordinate = Base64UrlSafeNoPadding::decode_to_vec(value, None)
        .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?;

    if coordinate.len() != COORDINATE_LENGTH {
        return Err(KeyAlgorithmError::Failed(format!(
            "invalid coordinate length: {}",
            coordinate.len()
        )));
    }

    Ok(coordinate)
}
