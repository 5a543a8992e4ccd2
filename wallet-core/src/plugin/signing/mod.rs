//! Proof issuance and verification, DID resolution and the raw JWE operations.
//!
//! This is the only plugin handling private keys. The key pairs themselves come from the
//! wallet identity at call time.

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use wallet_crypto::CryptoProvider;
use wallet_providers::{
    common_models::did::{DidValue, KeyRole},
    credential_formatter::{
        imp::{
            data_integrity::{model::ProofOptions, DataIntegrity},
            jwt_formatter::{self, model::PresentationJwtOptions},
        },
        model::{AuthenticationFn, Issuer},
    },
    did::{model::DidDocument, provider::DidMethodProvider},
    jwe::{self, model::Jwe},
    key_algorithm::{imp::eddsa::ed25519_private_key_to_x25519, provider::KeyAlgorithmProvider},
    util::key_verification::DocumentKeyVerifier,
};

use crate::{
    container::{argument, method, to_value, Args, Plugin, Wallet},
    error::WalletError,
    model::{Keypair, ProofFormat, SigningOptions, VerificationOptions},
    plugin::did_key::did_method_name,
};

use schema::Schemas;
use signer::KeypairSigner;

pub mod schema;
mod signer;
mod verify;

#[cfg(test)]
mod test;

pub const PLUGIN_NAME: &str = "signing";

const ASSERTION_METHOD: &str = "assertionMethod";
const AUTHENTICATION: &str = "authentication";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DocumentKind {
    Credential,
    Presentation,
}

impl DocumentKind {
    /// Field naming the signer.
    fn signer_field(&self) -> &'static str {
        match self {
            DocumentKind::Credential => "issuer",
            DocumentKind::Presentation => "holder",
        }
    }

    fn default_proof_purpose(&self) -> &'static str {
        match self {
            DocumentKind::Credential => ASSERTION_METHOD,
            DocumentKind::Presentation => AUTHENTICATION,
        }
    }
}

pub struct SigningPlugin {
    key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    did_method_provider: Arc<dyn DidMethodProvider>,
    data_integrity: DataIntegrity,
    schemas: Schemas,
    default_proof_format: ProofFormat,
}

impl SigningPlugin {
    pub fn new(
        crypto: Arc<dyn CryptoProvider>,
        key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
        did_method_provider: Arc<dyn DidMethodProvider>,
        default_proof_format: ProofFormat,
    ) -> Result<Self, WalletError> {
        Ok(Self {
            key_algorithm_provider,
            did_method_provider,
            data_integrity: DataIntegrity::new(crypto),
            schemas: Schemas::new()?,
            default_proof_format,
        })
    }

    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, WalletError> {
        tracing::debug!(%did, "resolving did");

        self.did_method_provider
            .resolve(did)
            .await
            .map_err(|e| WalletError::resolution(did.as_str(), e))
    }

    fn verifier(&self, document: DidDocument, role: KeyRole) -> DocumentKeyVerifier {
        DocumentKeyVerifier {
            key_algorithm_provider: self.key_algorithm_provider.clone(),
            document,
            role,
        }
    }

    fn auth_fn(&self, keypair: Keypair, key_id: String) -> Result<AuthenticationFn, WalletError> {
        let signer = self
            .key_algorithm_provider
            .get_signer(&keypair.algorithm.to_string())
            .map_err(|e| WalletError::UnsupportedAlgorithm(e.to_string()))?;

        Ok(Box::new(KeypairSigner {
            signer,
            keypair,
            key_id,
        }))
    }

    /// An explicit method must belong to `did`, otherwise the first one listed under `role`.
    async fn verification_method(
        &self,
        did: &DidValue,
        explicit: Option<&str>,
        role: KeyRole,
    ) -> Result<String, WalletError> {
        if let Some(method) = explicit {
            let method = if method.starts_with('#') {
                format!("{did}{method}")
            } else {
                method.to_owned()
            };

            if &DidValue::from_did_url(&method) != did {
                return Err(WalletError::validation(format!(
                    "Verification method `{method}` does not belong to `{did}`"
                )));
            }

            return Ok(method);
        }

        self.resolve(did)
            .await?
            .relationship(role)
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::Signature(format!("No `{role}` key in `{did}`")))
    }

    async fn issue(
        &self,
        wallet: &Wallet,
        kind: DocumentKind,
        mut document: Value,
        options: SigningOptions,
    ) -> Result<Value, WalletError> {
        let id = wallet.id()?;
        let keypair = id.keypair(options.key_algorithm.to_owned())?;
        let did = id.did(Some(did_method_name(keypair.algorithm).to_owned()))?;

        bind_signer(&mut document, kind.signer_field(), &did)?;

        match kind {
            DocumentKind::Credential => self.schemas.validate_credential(&document)?,
            DocumentKind::Presentation => self.schemas.validate_presentation(&document)?,
        }

        let proof_purpose = options
            .proof_purpose
            .to_owned()
            .unwrap_or_else(|| kind.default_proof_purpose().to_owned());
        let role = KeyRole::from_str(&proof_purpose).map_err(|_| {
            WalletError::validation(format!("Unknown proof purpose: `{proof_purpose}`"))
        })?;

        let created = match options.created.as_deref() {
            Some(created) => OffsetDateTime::parse(created, &Rfc3339).map_err(|e| {
                WalletError::validation(format!("Invalid created date `{created}`: {e}"))
            })?,
            None => OffsetDateTime::now_utc(),
        };

        let verification_method = self
            .verification_method(&did, options.verification_method.as_deref(), role)
            .await?;

        let algorithm = keypair.algorithm;
        let auth_fn = self.auth_fn(keypair, verification_method.to_owned())?;
        let format = options.proof_format.unwrap_or(self.default_proof_format);

        tracing::debug!(?kind, %format, %verification_method, "signing");

        let signed = match (format, kind) {
            (ProofFormat::Ldp, _) => {
                self.data_integrity
                    .add_proof(
                        &document,
                        ProofOptions {
                            algorithm,
                            verification_method,
                            proof_purpose,
                            created,
                            challenge: options.challenge,
                            domain: options.domain,
                        },
                        auth_fn,
                    )
                    .await?
            }
            (ProofFormat::Jwt, DocumentKind::Credential) => Value::String(
                jwt_formatter::format_credential(&document, algorithm.jose_alg(), auth_fn).await?,
            ),
            (ProofFormat::Jwt, DocumentKind::Presentation) => Value::String(
                jwt_formatter::format_presentation(
                    &document,
                    algorithm.jose_alg(),
                    PresentationJwtOptions {
                        challenge: options.challenge,
                        domain: options.domain,
                    },
                    auth_fn,
                )
                .await?,
            ),
        };

        Ok(signed)
    }

    async fn resolve_did(&self, did: String) -> Result<Value, WalletError> {
        let did = DidValue::from(did);
        let document = self.resolve(&did).await?;

        document.to_json().map_err(|e| WalletError::Resolution {
            did: did.to_string(),
            reason: e.to_string(),
        })
    }

    async fn did_to_verification_method(&self, did: String) -> Result<String, WalletError> {
        let did = DidValue::from(did);

        self.resolve(&did)
            .await?
            .relationship(KeyRole::AssertionMethod)
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::Resolution {
                did: did.to_string(),
                reason: "No assertion method".to_string(),
            })
    }

    async fn create_jwe(
        &self,
        cleartext: String,
        recipients: Vec<String>,
        aad: Option<String>,
    ) -> Result<Jwe, WalletError> {
        let mut keys = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            let document = self.resolve(&DidValue::from(recipient)).await?;
            keys.push(jwe::recipient_key(&document)?);
        }

        Ok(jwe::encrypt(
            cleartext.as_bytes(),
            &keys,
            aad.as_deref().map(str::as_bytes),
        )?)
    }

    /// Every failure is the same [`WalletError::Decryption`].
    async fn decrypt_jwe(
        &self,
        wallet: &Wallet,
        jwe: Jwe,
        aad: Option<String>,
    ) -> Result<String, WalletError> {
        let keypair = wallet.id()?.keypair(None)?;
        let private_key = ed25519_private_key_to_x25519(&keypair.private_key)
            .map_err(|_| WalletError::Decryption)?;

        let cleartext = jwe::decrypt(&jwe, &private_key, aad.as_deref().map(str::as_bytes))
            .map_err(|_| WalletError::Decryption)?;

        String::from_utf8(cleartext.to_vec()).map_err(|_| WalletError::Decryption)
    }
}

/// Fills `field` with `did` when absent. A different signer is rejected, anything else is
/// left to schema validation.
fn bind_signer(document: &mut Value, field: &str, did: &DidValue) -> Result<(), WalletError> {
    let object = document
        .as_object_mut()
        .ok_or_else(|| WalletError::validation("Expected a JSON object"))?;

    match object.get(field) {
        None | Some(Value::Null) => {
            object.insert(field.to_owned(), json!(did));
        }
        Some(value) => {
            if let Ok(signer) = serde_json::from_value::<Issuer>(value.to_owned()) {
                if signer.id() != did.as_str() {
                    return Err(WalletError::validation(format!(
                        "/{field}: `{}` differs from the signing did `{did}`",
                        signer.id()
                    )));
                }
            }
        }
    }

    Ok(())
}

#[async_trait]
impl Plugin for SigningPlugin {
    fn name(&self) -> String {
        PLUGIN_NAME.to_owned()
    }

    fn methods(&self) -> Vec<String> {
        [
            method::ISSUE_CREDENTIAL,
            method::VERIFY_CREDENTIAL,
            method::ISSUE_PRESENTATION,
            method::VERIFY_PRESENTATION,
            method::RESOLVE_DID,
            method::DID_TO_VERIFICATION_METHOD,
            method::CREATE_JWE,
            method::DECRYPT_JWE,
            method::CLEAR_DID_CACHE,
        ]
        .map(str::to_owned)
        .to_vec()
    }

    async fn call(&self, wallet: &Wallet, name: &str, args: Args) -> Result<Value, WalletError> {
        match name {
            method::ISSUE_CREDENTIAL | method::ISSUE_PRESENTATION => {
                let kind = if name == method::ISSUE_CREDENTIAL {
                    DocumentKind::Credential
                } else {
                    DocumentKind::Presentation
                };
                let document: Value = argument(name, &args, 0)?;
                let options: Option<SigningOptions> = argument(name, &args, 1)?;

                self.issue(wallet, kind, document, options.unwrap_or_default())
                    .await
            }
            method::VERIFY_CREDENTIAL => {
                let credential: Value = argument(name, &args, 0)?;
                let options: Option<VerificationOptions> = argument(name, &args, 1)?;

                let result = self
                    .verify_credential(&credential, &options.unwrap_or_default())
                    .await?;
                to_value(name, result)
            }
            method::VERIFY_PRESENTATION => {
                let presentation: Value = argument(name, &args, 0)?;
                let options: Option<VerificationOptions> = argument(name, &args, 1)?;

                let result = self
                    .verify_presentation(wallet, &presentation, &options.unwrap_or_default())
                    .await?;
                to_value(name, result)
            }
            method::RESOLVE_DID => {
                let did: String = argument(name, &args, 0)?;
                let input_metadata: Option<Value> = argument(name, &args, 1)?;
                if input_metadata.is_some() {
                    tracing::debug!(%did, "resolution input metadata ignored");
                }

                self.resolve_did(did).await
            }
            method::DID_TO_VERIFICATION_METHOD => {
                let did: String = argument(name, &args, 0)?;
                to_value(name, self.did_to_verification_method(did).await?)
            }
            method::CREATE_JWE => {
                let cleartext: String = argument(name, &args, 0)?;
                let recipients: Vec<String> = argument(name, &args, 1)?;
                let aad: Option<String> = argument(name, &args, 2)?;

                to_value(name, self.create_jwe(cleartext, recipients, aad).await?)
            }
            method::DECRYPT_JWE => {
                let jwe: Jwe = argument(name, &args, 0).map_err(|_| WalletError::Decryption)?;
                let aad: Option<String> = argument(name, &args, 1)?;

                to_value(name, self.decrypt_jwe(wallet, jwe, aad).await?)
            }
            method::CLEAR_DID_CACHE => {
                self.did_method_provider
                    .clear_cache()
                    .await
                    .map_err(|e| WalletError::Storage(e.to_string()))?;
                Ok(Value::Null)
            }
            _ => Err(WalletError::MethodNotFound(name.to_owned())),
        }
    }
}
