use std::str::FromStr;

use serde_json::Value;
use wallet_providers::{
    common_models::did::{DidValue, KeyRole},
    credential_formatter::{
        error::FormatterError,
        imp::{
            data_integrity::{model::DataIntegrityProof, DataIntegrity},
            jwt::Jwt,
            jwt_formatter,
        },
        model::Issuer,
    },
    did::model::DidDocument,
    key_algorithm::model::KeyAlgorithmType,
};

use super::{SigningPlugin, ASSERTION_METHOD, AUTHENTICATION};
use crate::{
    container::Wallet,
    error::WalletError,
    model::{VerificationCheck, VerificationOptions, CHECK_JWS, CHECK_PROOF},
};

impl SigningPlugin {
    pub(super) async fn verify_credential(
        &self,
        credential: &Value,
        options: &VerificationOptions,
    ) -> Result<VerificationCheck, WalletError> {
        let purpose = options.proof_purpose.as_deref().unwrap_or(ASSERTION_METHOD);

        match credential {
            Value::String(token) if jwt_formatter::is_jwt(token) => {
                self.verify_credential_jwt(token, purpose).await
            }
            Value::Object(_) => {
                let mut result = VerificationCheck::default();

                let Some(issuer) = Issuer::from_field(credential, "issuer") else {
                    return Ok(VerificationCheck::failed("Missing issuer"));
                };

                self.verify_embedded_proof(credential, issuer.id(), purpose, &mut result)
                    .await?;

                Ok(result)
            }
            _ => Err(WalletError::validation(
                "Expected a credential object or a VC-JWT",
            )),
        }
    }

    async fn verify_credential_jwt(
        &self,
        token: &str,
        purpose: &str,
    ) -> Result<VerificationCheck, WalletError> {
        let jwt = match jwt_formatter::extract_credential(token, None).await {
            Ok(jwt) => jwt,
            Err(e) => return Ok(VerificationCheck::failed(format!("Invalid JWT: {e}"))),
        };

        let Some(issuer) = jwt.payload.issuer.as_deref() else {
            return Ok(VerificationCheck::failed("Missing issuer"));
        };

        let mut result = VerificationCheck::default();

        if let Some(vc_issuer) = signer_of(jwt.payload.custom.vc.get("issuer")) {
            if vc_issuer.id() != issuer {
                result.error(format!(
                    "Issuer `{}` differs from JWT issuer `{issuer}`",
                    vc_issuer.id()
                ));
            }
        }

        self.verify_jws(
            token,
            issuer,
            jwt.header.key_id.as_deref(),
            purpose,
            &mut result,
        )
        .await?;

        Ok(result)
    }

    pub(super) async fn verify_presentation(
        &self,
        wallet: &Wallet,
        presentation: &Value,
        options: &VerificationOptions,
    ) -> Result<VerificationCheck, WalletError> {
        let purpose = options.proof_purpose.as_deref().unwrap_or(AUTHENTICATION);
        let mut result = VerificationCheck::default();

        let credentials = match presentation {
            Value::String(token) if jwt_formatter::is_jwt(token) => {
                let jwt = match jwt_formatter::extract_presentation(token, None).await {
                    Ok(jwt) => jwt,
                    Err(e) => return Ok(VerificationCheck::failed(format!("Invalid JWT: {e}"))),
                };

                let Some(issuer) = jwt.payload.issuer.as_deref() else {
                    return Ok(VerificationCheck::failed("Missing holder"));
                };

                if let Some(holder) = signer_of(jwt.payload.custom.vp.get("holder")) {
                    if holder.id() != issuer {
                        result.error(format!(
                            "Holder `{}` differs from JWT issuer `{issuer}`",
                            holder.id()
                        ));
                    }
                }

                self.verify_jws(
                    token,
                    issuer,
                    jwt.header.key_id.as_deref(),
                    purpose,
                    &mut result,
                )
                .await?;

                check_binding(
                    "challenge",
                    options.challenge.as_deref(),
                    jwt.payload.nonce.as_deref(),
                    &mut result,
                );
                if let Some(domain) = options.domain.as_deref() {
                    let audience = jwt.payload.audience.as_deref().unwrap_or_default();
                    if !audience.iter().any(|aud| aud == domain) {
                        result.error(format!("Domain mismatch, expected `{domain}`"));
                    }
                }

                jwt.payload.custom.vp.get("verifiableCredential").cloned()
            }
            Value::Object(_) => {
                let Some(holder) = Issuer::from_field(presentation, "holder") else {
                    return Ok(VerificationCheck::failed("Missing holder"));
                };

                if let Some(proof) = self
                    .verify_embedded_proof(presentation, holder.id(), purpose, &mut result)
                    .await?
                {
                    check_binding(
                        "challenge",
                        options.challenge.as_deref(),
                        proof.challenge.as_deref(),
                        &mut result,
                    );
                    check_binding(
                        "domain",
                        options.domain.as_deref(),
                        proof.domain.as_deref(),
                        &mut result,
                    );
                }

                presentation.get("verifiableCredential").cloned()
            }
            _ => {
                return Err(WalletError::validation(
                    "Expected a presentation object or a VP-JWT",
                ))
            }
        };

        if options.check_credentials {
            verify_embedded_credentials(wallet, credentials, &mut result).await?;
        }

        Ok(result)
    }

    /// Returns the parsed proof unless it is missing or malformed.
    async fn verify_embedded_proof(
        &self,
        document: &Value,
        signer: &str,
        purpose: &str,
        result: &mut VerificationCheck,
    ) -> Result<Option<DataIntegrityProof>, WalletError> {
        let proof = match DataIntegrity::extract_proof(document) {
            Ok(proof) => proof,
            Err(FormatterError::MissingProof) => {
                result.error("No proof");
                return Ok(None);
            }
            Err(e) => {
                result.error(e.to_string());
                return Ok(None);
            }
        };

        if KeyAlgorithmType::from_cryptosuite(&proof.cryptosuite).is_none() {
            result.error(format!("Unsupported cryptosuite: `{}`", proof.cryptosuite));
            return Ok(Some(proof));
        }

        if proof.proof_purpose != purpose {
            result.error(format!(
                "Proof purpose `{}` does not match `{purpose}`",
                proof.proof_purpose
            ));
            return Ok(Some(proof));
        }

        let Some(role) = proof_role(purpose, result) else {
            return Ok(Some(proof));
        };

        let did = DidValue::from_did_url(&proof.verification_method);
        if did.as_str() != signer {
            result.error(format!(
                "Verification method `{}` does not belong to `{signer}`",
                proof.verification_method
            ));
            return Ok(Some(proof));
        }

        let did_document = self.resolve(&did).await?;
        if !is_authorized(&did_document, &proof.verification_method, role) {
            result.error(format!(
                "Verification method `{}` is not authorized for `{purpose}`",
                proof.verification_method
            ));
            return Ok(Some(proof));
        }

        let verifier = self.verifier(did_document, role);
        match self.data_integrity.verify_proof(document, &verifier).await {
            Ok(_) => result.check(CHECK_PROOF),
            Err(e) => result.error(format!("signature error: {e}")),
        }

        Ok(Some(proof))
    }

    /// Checks a compact JWS signed by `signer`. Without `kid` the first key listed for
    /// `purpose` is used.
    async fn verify_jws(
        &self,
        token: &str,
        signer: &str,
        key_id: Option<&str>,
        purpose: &str,
        result: &mut VerificationCheck,
    ) -> Result<(), WalletError> {
        let Some(role) = proof_role(purpose, result) else {
            return Ok(());
        };

        let did = DidValue::from(signer.to_owned());
        let did_document = self.resolve(&did).await?;

        if let Some(key_id) = key_id {
            let method_id = did_document.absolute_id(key_id);

            if DidValue::from_did_url(&method_id) != did {
                result.error(format!(
                    "Verification method `{method_id}` does not belong to `{signer}`"
                ));
                return Ok(());
            }

            if !is_authorized(&did_document, &method_id, role) {
                result.error(format!(
                    "Verification method `{method_id}` is not authorized for `{purpose}`"
                ));
                return Ok(());
            }
        }

        let verifier = self.verifier(did_document, role);
        match Jwt::<Value>::parse(token, Some(&verifier)).await {
            Ok(_) => result.check(CHECK_JWS),
            Err(e) => result.error(format!("signature error: {e}")),
        }

        Ok(())
    }
}

fn signer_of(value: Option<&Value>) -> Option<Issuer> {
    serde_json::from_value(value?.to_owned()).ok()
}

fn proof_role(purpose: &str, result: &mut VerificationCheck) -> Option<KeyRole> {
    let role = KeyRole::from_str(purpose).ok();
    if role.is_none() {
        result.error(format!("Unknown proof purpose: `{purpose}`"));
    }
    role
}

fn is_authorized(did_document: &DidDocument, method_id: &str, role: KeyRole) -> bool {
    did_document
        .relationship(role)
        .contains(&did_document.absolute_id(method_id))
}

fn check_binding(
    name: &str,
    expected: Option<&str>,
    actual: Option<&str>,
    result: &mut VerificationCheck,
) {
    if let Some(expected) = expected {
        if actual != Some(expected) {
            result.error(format!("{name} mismatch, expected `{expected}`"));
        }
    }
}

/// Verifies each embedded credential through the wallet and merges the outcome.
async fn verify_embedded_credentials(
    wallet: &Wallet,
    credentials: Option<Value>,
    result: &mut VerificationCheck,
) -> Result<(), WalletError> {
    let credentials = match credentials {
        None | Some(Value::Null) => vec![],
        Some(Value::Array(credentials)) => credentials,
        Some(credential) => vec![credential],
    };

    for (index, credential) in credentials.iter().enumerate() {
        let check = wallet.invoke().verify_credential(credential, None).await?;

        result.errors.extend(
            check
                .errors
                .into_iter()
                .map(|error| format!("credential {index}: {error}")),
        );
        result.warnings.extend(
            check
                .warnings
                .into_iter()
                .map(|warning| format!("credential {index}: {warning}")),
        );
    }

    Ok(())
}
