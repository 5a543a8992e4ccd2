//! JSON schemas of unsigned credentials and presentations.

use jsonschema::Validator;
use serde_json::{json, Value};

use crate::error::WalletError;

pub const VCDM_1_1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
pub const VCDM_2_0_CONTEXT: &str = "https://www.w3.org/ns/credentials/v2";
const OPEN_BADGES_CONTEXT_PATTERN: &str = r"^https://purl\.imsglobal\.org/spec/ob/v3p0/context";

fn context_schema() -> Value {
    json!({
        "type": "array",
        "minItems": 1,
        "items": [{ "enum": [VCDM_1_1_CONTEXT, VCDM_2_0_CONTEXT] }],
        "additionalItems": { "type": ["string", "object"] }
    })
}

fn id_reference_schema() -> Value {
    json!({
        "oneOf": [
            { "type": "string", "minLength": 1 },
            {
                "type": "object",
                "required": ["id"],
                "properties": { "id": { "type": "string", "minLength": 1 } }
            }
        ]
    })
}

fn credential_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["@context", "type", "issuer", "credentialSubject"],
        "properties": {
            "@context": context_schema(),
            "id": { "type": "string" },
            "type": {
                "type": "array",
                "minItems": 1,
                "items": { "type": "string" },
                "contains": { "const": "VerifiableCredential" }
            },
            "issuer": id_reference_schema(),
            "credentialSubject": {
                "oneOf": [
                    { "type": "object" },
                    { "type": "array", "minItems": 1, "items": { "type": "object" } }
                ]
            },
            "issuanceDate": { "type": "string", "format": "date-time" },
            "expirationDate": { "type": "string", "format": "date-time" },
            "validFrom": { "type": "string", "format": "date-time" },
            "validUntil": { "type": "string", "format": "date-time" }
        },
        "allOf": [
            {
                "if": {
                    "properties": { "@context": { "contains": { "const": VCDM_1_1_CONTEXT } } }
                },
                "then": { "required": ["issuanceDate"] }
            },
            {
                "if": {
                    "required": ["type"],
                    "properties": {
                        "type": {
                            "contains": { "enum": ["OpenBadgeCredential", "AchievementCredential"] }
                        }
                    }
                },
                "then": {
                    "properties": {
                        "@context": {
                            "contains": { "type": "string", "pattern": OPEN_BADGES_CONTEXT_PATTERN }
                        }
                    }
                }
            }
        ]
    })
}

fn presentation_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["@context", "type", "holder"],
        "properties": {
            "@context": context_schema(),
            "id": { "type": "string" },
            "type": {
                "type": "array",
                "minItems": 1,
                "items": { "type": "string" },
                "contains": { "const": "VerifiablePresentation" }
            },
            "holder": id_reference_schema(),
            "verifiableCredential": {
                "oneOf": [
                    { "type": ["object", "string"] },
                    { "type": "array", "items": { "type": ["object", "string"] } }
                ]
            }
        }
    })
}

/// Validators compiled once per plugin instance.
pub struct Schemas {
    credential: Validator,
    presentation: Validator,
}

impl Schemas {
    pub fn new() -> Result<Self, WalletError> {
        Ok(Self {
            credential: compile(&credential_schema())?,
            presentation: compile(&presentation_schema())?,
        })
    }

    pub fn validate_credential(&self, credential: &Value) -> Result<(), WalletError> {
        validate(&self.credential, credential)
    }

    pub fn validate_presentation(&self, presentation: &Value) -> Result<(), WalletError> {
        validate(&self.presentation, presentation)
    }
}

fn compile(schema: &Value) -> Result<Validator, WalletError> {
    jsonschema::options()
        .should_validate_formats(true)
        .build(schema)
        .map_err(|e| WalletError::validation(format!("Invalid schema: {e}")))
}

/// Collects every violation as `path: message`.
fn validate(validator: &Validator, instance: &Value) -> Result<(), WalletError> {
    let violations: Vec<String> = validator
        .iter_errors(instance)
        .map(|error| {
            let path = error.instance_path.to_string();
            let path = if path.is_empty() { "/".to_owned() } else { path };
            format!("{path}: {error}")
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(WalletError::Validation(violations))
    }
}
