//! Compact JWS envelope shared by the VC-JWT and VP-JWT formats.

use std::fmt::Debug;

use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use serde::{de::DeserializeOwned, Serialize};

use self::model::{JwtHeader, JwtPayload};
use crate::{
    common_models::did::DidValue,
    credential_formatter::{
        error::FormatterError,
        model::{SignatureProvider, TokenVerifier},
    },
};


pub mod model;

#[derive(Debug)]
pub struct Jwt<Payload> {
    pub header: JwtHeader,
    pub payload: JwtPayload<Payload>,
}

/// A token split at its dots, segments decoded.
#[derive(Debug)]
pub struct TokenParts<Payload> {
    pub header: JwtHeader,
    pub payload: JwtPayload<Payload>,
    /// `header.payload` exactly as received.
    pub signing_input: String,
    pub signature: Vec<u8>,
}

impl<Payload: Serialize + DeserializeOwned + Debug> Jwt<Payload> {
    pub fn new(
        token_type: &str,
        algorithm: &str,
        key_id: Option<String>,
        payload: JwtPayload<Payload>,
    ) -> Self {
        Self {
            header: JwtHeader {
                algorithm: algorithm.to_owned(),
                key_id,
                token_type: Some(token_type.to_owned()),
            },
            payload,
        }
    }

    /// Serializes and signs. Tokens without a signature are never produced.
    pub async fn sign(&self, signer: &dyn SignatureProvider) -> Result<String, FormatterError> {
        let signing_input = format!(
            "{}.{}",
            encode_json(&self.header)?,
            encode_json(&self.payload)?
        );

        let signature = signer
            .sign(signing_input.as_bytes())
            .await
            .map_err(|e| FormatterError::CouldNotSign(e.to_string()))?;
        if signature.is_empty() {
            return Err(FormatterError::CouldNotSign("Empty signature".to_owned()));
        }

        let signature = Base64UrlSafeNoPadding::encode_to_string(signature)
            .map_err(|e| FormatterError::CouldNotFormat(e.to_string()))?;

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Decodes `token`. With a `verifier` the signature is checked against `iss` and `kid`.
    pub async fn parse(
        token: &str,
        verifier: Option<&dyn TokenVerifier>,
    ) -> Result<Self, FormatterError> {
        let TokenParts {
            header,
            payload,
            signing_input,
            signature,
        } = Self::split(token)?;

        if let Some(verifier) = verifier {
            verifier
                .verify(
                    payload.issuer.to_owned().map(DidValue::from),
                    header.key_id.as_deref(),
                    &header.algorithm,
                    signing_input.as_bytes(),
                    &signature,
                )
                .await
                .map_err(|e| FormatterError::CouldNotVerify(e.to_string()))?;
        }

        Ok(Self { header, payload })
    }

    pub fn split(token: &str) -> Result<TokenParts<Payload>, FormatterError> {
        let token = token.trim();

        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(FormatterError::CouldNotExtractCredentials(
                "Expected three token segments".to_owned(),
            ));
        };

        Ok(TokenParts {
            header: decode_json(header)?,
            payload: decode_json(payload)?,
            signing_input: format!("{header}.{payload}"),
            signature: decode(signature)?,
        })
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, FormatterError> {
    let json =
        serde_json::to_vec(value).map_err(|e| FormatterError::CouldNotFormat(e.to_string()))?;

    Base64UrlSafeNoPadding::encode_to_string(json)
        .map_err(|e| FormatterError::CouldNotFormat(e.to_string()))
}

fn decode(segment: &str) -> Result<Vec<u8>, FormatterError> {
    Base64UrlSafeNoPadding::decode_to_vec(segment, None)
        .map_err(|e| FormatterError::CouldNotExtractCredentials(e.to_string()))
}

fn decode_json<T: DeserializeOwned>(segment: &str) -> Result<T, FormatterError> {
    serde_json::from_slice(&decode(segment)?)
        .map_err(|e| FormatterError::CouldNotExtractCredentials(e.to_string()))
}
