use serde_json::json;

use crate::{
    common_models::{did::DidValue, PublicKeyJwk},
    did::{
        error::DidMethodError,
        model::{DidDocument, DidVerificationMethod},
    },
};

const VERIFICATION_METHOD_TYPE: &str = "JsonWebKey2020";

#[derive(Debug, Eq, PartialEq)]
pub enum DidKeyType {
    Eddsa,
    Ecdsa,
}

impl DidKeyType {
    fn multicodec(&self) -> [u8; 2] {
        match self {
            DidKeyType::Eddsa => [0xed, 0x01],
            DidKeyType::Ecdsa => [0x80, 0x24],
        }
    }

    pub fn key_algorithm_id(&self) -> &'static str {
        match self {
            DidKeyType::Eddsa => "EDDSA",
            DidKeyType::Ecdsa => "ES256",
        }
    }
}

#[derive(Debug)]
pub struct DecodedDidKey {
    pub multibase: String,
    pub decoded_multibase: Vec<u8>,
    pub type_: DidKeyType,
}

pub fn decode_did(did: &DidValue) -> Result<DecodedDidKey, DidMethodError> {
    let tail = did
        .as_str()
        .strip_prefix("did:key:")
        .ok_or_else(|| DidMethodError::ResolutionError("Invalid did key prefix".into()))?;

    let type_ = if tail.starts_with("z6Mk") {
        DidKeyType::Eddsa
    } else if tail.starts_with("zDn") {
        DidKeyType::Ecdsa
    } else {
        return Err(DidMethodError::ResolutionError(
            "Unsupported key algorithm".to_string(),
        ));
    };

    let decoded = bs58::decode(&tail[1..]).into_vec().map_err(|err| {
        DidMethodError::ResolutionError(format!("Invalid did key multibase suffix: {err}"))
    })?;

    // all supported key algorithms have a two byte multicodec prefix
    let Some(key) = decoded.strip_prefix(type_.multicodec().as_slice()) else {
        return Err(DidMethodError::ResolutionError(
            "Invalid did key multicodec".to_string(),
        ));
    };

    Ok(DecodedDidKey {
        multibase: tail.into(),
        decoded_multibase: key.to_vec(),
        type_,
    })
}

/// Key agreement method listed next to the signing key, as `(multibase, jwk)`.
pub type KeyAgreementKey = (String, PublicKeyJwk);

pub fn generate_document(
    decoded: DecodedDidKey,
    did: &DidValue,
    public_key_jwk: PublicKeyJwk,
    key_agreement: Option<KeyAgreementKey>,
) -> DidDocument {
    let verification_method =
        jwk_verification_method(format!("{did}#{}", decoded.multibase), did, public_key_jwk);
    let signing_id = verification_method.id.clone();

    let mut verification_methods = vec![verification_method];

    let key_agreement_id = match key_agreement {
        Some((multibase, jwk)) => {
            let method = jwk_verification_method(format!("{did}#{multibase}"), did, jwk);
            let id = method.id.clone();
            verification_methods.push(method);
            id
        }
        None => signing_id.clone(),
    };

    DidDocument {
        context: json!([
            "https://www.w3.org/ns/did/v1",
            "https://w3id.org/security/suites/jws-2020/v1",
        ]),
        id: did.clone(),
        authentication: Some(vec![signing_id.clone().into()]),
        assertion_method: Some(vec![signing_id.clone().into()]),
        capability_invocation: Some(vec![signing_id.clone().into()]),
        capability_delegation: Some(vec![signing_id.into()]),
        key_agreement: Some(vec![key_agreement_id.into()]),
        verification_method: verification_methods,
        rest: Default::default(),
    }
}

fn jwk_verification_method(id: String, did: &DidValue, jwk: PublicKeyJwk) -> DidVerificationMethod {
    DidVerificationMethod::from_jwk(id, VERIFICATION_METHOD_TYPE, did.to_string(), jwk)
}
