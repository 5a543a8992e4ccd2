//! VC-JWT and VP-JWT envelopes.
//!
//! The credential (or presentation) without its `proof` goes into the `vc` (`vp`) claim.
//! Registered claims mirror the document: `iss`, `sub`, `jti`, `nbf` and `exp` for
//! credentials, `iss`, `nonce` and `aud` for presentations.

use model::{JsonObject, PresentationJwtOptions, VC, VP};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::jwt::{model::JwtPayload, Jwt};
use crate::credential_formatter::{
    error::FormatterError,
    model::{AuthenticationFn, Issuer, TokenVerifier},
};

#[cfg(test)]
mod test;

pub mod model;

const JWT_TYPE: &str = "JWT";

/// Compact JWS tokens start with a base64url encoded `{"`.
pub fn is_jwt(value: &str) -> bool {
    value.starts_with("eyJ") && value.split('.').count() == 3
}

pub async fn format_credential(
    credential: &serde_json::Value,
    algorithm: &str,
    auth_fn: AuthenticationFn,
) -> Result<String, FormatterError> {
    let vc = strip_proof(credential)?;

    let issuer = Issuer::from_field(credential, "issuer").ok_or(FormatterError::MissingIssuer)?;

    let payload = JwtPayload {
        issuer: Some(issuer.id().to_owned()),
        subject: first_subject_id(&vc),
        token_id: vc.get("id").and_then(|id| id.as_str()).map(str::to_owned),
        not_before: read_date(&vc, &["issuanceDate", "validFrom"])?,
        expires_at: read_date(&vc, &["expirationDate", "validUntil"])?,
        custom: VC { vc },
        ..Default::default()
    };

    Jwt::new(JWT_TYPE, algorithm, auth_fn.get_key_id(), payload)
        .sign(auth_fn.as_ref())
        .await
}

pub async fn format_presentation(
    presentation: &serde_json::Value,
    algorithm: &str,
    options: PresentationJwtOptions,
    auth_fn: AuthenticationFn,
) -> Result<String, FormatterError> {
    let vp = strip_proof(presentation)?;

    let holder = Issuer::from_field(presentation, "holder").ok_or(FormatterError::MissingIssuer)?;

    let payload = JwtPayload {
        issuer: Some(holder.id().to_owned()),
        audience: options.domain.map(|domain| vec![domain]),
        token_id: vp.get("id").and_then(|id| id.as_str()).map(str::to_owned),
        nonce: options.challenge,
        custom: VP { vp },
        ..Default::default()
    };

    Jwt::new(JWT_TYPE, algorithm, auth_fn.get_key_id(), payload)
        .sign(auth_fn.as_ref())
        .await
}

/// Parses a VC-JWT. With a `verifier` the signature is checked against `iss`.
pub async fn extract_credential(
    token: &str,
    verifier: Option<&dyn TokenVerifier>,
) -> Result<Jwt<VC>, FormatterError> {
    Jwt::parse(token, verifier).await
}

/// Parses a VP-JWT. With a `verifier` the signature is checked against `iss`.
pub async fn extract_presentation(
    token: &str,
    verifier: Option<&dyn TokenVerifier>,
) -> Result<Jwt<VP>, FormatterError> {
    Jwt::parse(token, verifier)
        .await
        .map_err(|e| match e {
            FormatterError::CouldNotExtractCredentials(e) => {
                FormatterError::CouldNotExtractPresentation(e)
            }
            e => e,
        })
}

fn strip_proof(document: &serde_json::Value) -> Result<JsonObject, FormatterError> {
    let mut object = document
        .as_object()
        .ok_or(FormatterError::CouldNotFormat("Expected a JSON object".to_string()))?
        .to_owned();
    object.remove("proof");
    Ok(object)
}

fn read_date(
    document: &JsonObject,
    fields: &[&str],
) -> Result<Option<OffsetDateTime>, FormatterError> {
    let Some(value) = fields.iter().find_map(|field| document.get(*field)) else {
        return Ok(None);
    };

    let value = value
        .as_str()
        .ok_or(FormatterError::CouldNotFormat("Date must be a string".to_string()))?;

    OffsetDateTime::parse(value, &Rfc3339)
        .map(Some)
        .map_err(|e| FormatterError::CouldNotFormat(format!("Invalid date `{value}`: {e}")))
}

fn first_subject_id(document: &JsonObject) -> Option<String> {
    let subject = match document.get("credentialSubject")? {
        serde_json::Value::Array(subjects) => subjects.first()?,
        subject => subject,
    };

    subject.get("id")?.as_str().map(str::to_owned)
}
