//! Credential Handler API adapter.
//!
//! The browser side is reached through [`CredentialHandler`]. Storing a credential first
//! asks the holder for a DID authentication presentation, then issues the credential to
//! the authenticated DID.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;
use wallet_providers::credential_formatter::{imp::jwt_formatter, model::Issuer};

use crate::{
    container::{argument, method, to_value, Args, Plugin, Wallet},
    error::WalletError,
    model::VerificationOptions,
};


pub const PLUGIN_NAME: &str = "chapi";

const DID_AUTHENTICATION: &str = "DIDAuthentication";

pub const REASON_DID_NOT_AUTH: &str = "did not auth";
pub const REASON_AUTH_FAILED: &str = "auth failed verification";
pub const REASON_DID_NOT_STORE: &str = "did not store";

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CredentialHandler: Send + Sync {
    /// Sends a web credential request. `None` when the user declined.
    async fn get(&self, request: Value) -> Result<Option<Value>, WalletError>;

    /// Offers a presentation for storage. `None` when nothing was stored.
    async fn store(&self, presentation: Value) -> Result<Option<Value>, WalletError>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapiParams {
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapiStoreResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ChapiStoreResult {
    fn success() -> Self {
        Self {
            success: true,
            reason: None,
        }
    }

    fn failure(reason: &str) -> Self {
        Self {
            success: false,
            reason: Some(reason.to_owned()),
        }
    }
}

pub struct ChapiPlugin {
    params: ChapiParams,
    handler: Arc<dyn CredentialHandler>,
}

impl ChapiPlugin {
    pub fn new(params: ChapiParams, handler: Arc<dyn CredentialHandler>) -> Self {
        Self { params, handler }
    }

    fn did_auth_request(&self, challenge: &str) -> Value {
        json!({
            "web": {
                "VerifiablePresentation": {
                    "query": { "type": DID_AUTHENTICATION },
                    "challenge": challenge,
                    "domain": self.params.domain
                }
            }
        })
    }

    async fn store_credential_via_did_auth(
        &self,
        wallet: &Wallet,
        mut credential: Value,
    ) -> Result<ChapiStoreResult, WalletError> {
        let challenge = Uuid::new_v4().to_string();

        let Some(presentation) = self.handler.get(self.did_auth_request(&challenge)).await? else {
            return Ok(ChapiStoreResult::failure(REASON_DID_NOT_AUTH));
        };

        let options = VerificationOptions {
            proof_purpose: Some("authentication".to_owned()),
            challenge: Some(challenge),
            domain: Some(self.params.domain.to_owned()),
            check_credentials: false,
        };
        let verification = wallet
            .invoke()
            .verify_presentation(&presentation, Some(&options))
            .await?;
        if !verification.is_verified() {
            tracing::debug!(errors = ?verification.errors, "did auth rejected");
            return Ok(ChapiStoreResult::failure(REASON_AUTH_FAILED));
        }

        let Some(holder) = holder_of(&presentation).await else {
            return Ok(ChapiStoreResult::failure(REASON_AUTH_FAILED));
        };
        bind_subject(&mut credential, &holder)?;

        let issued = wallet.invoke().issue_credential(&credential, None).await?;
        let presentation = wallet.invoke().get_test_vp(Some(&issued)).await?;
        let presentation = wallet
            .invoke()
            .issue_presentation(&presentation, None)
            .await?;

        match self.handler.store(presentation).await? {
            Some(_) => Ok(ChapiStoreResult::success()),
            None => Ok(ChapiStoreResult::failure(REASON_DID_NOT_STORE)),
        }
    }
}

async fn holder_of(presentation: &Value) -> Option<String> {
    match presentation {
        Value::String(token) => jwt_formatter::extract_presentation(token, None)
            .await
            .ok()?
            .payload
            .issuer,
        presentation => Issuer::from_field(presentation, "holder").map(|h| h.id().to_owned()),
    }
}

/// Sets `credentialSubject.id` on every subject.
fn bind_subject(credential: &mut Value, holder: &str) -> Result<(), WalletError> {
    match credential.get_mut("credentialSubject") {
        Some(Value::Object(subject)) => {
            subject.insert("id".to_owned(), json!(holder));
        }
        Some(Value::Array(subjects)) => {
            for subject in subjects.iter_mut().filter_map(Value::as_object_mut) {
                subject.insert("id".to_owned(), json!(holder));
            }
        }
        _ => {
            return Err(WalletError::validation(
                "/credentialSubject: expected an object",
            ))
        }
    }

    Ok(())
}

#[async_trait]
impl Plugin for ChapiPlugin {
    fn name(&self) -> String {
        PLUGIN_NAME.to_owned()
    }

    fn methods(&self) -> Vec<String> {
        vec![
            method::STORE_CREDENTIAL_VIA_CHAPI_DID_AUTH.to_owned(),
            method::STORE_PRESENTATION_VIA_CHAPI.to_owned(),
        ]
    }

    fn dependent_methods(&self) -> Vec<String> {
        [
            method::ISSUE_CREDENTIAL,
            method::ISSUE_PRESENTATION,
            method::VERIFY_PRESENTATION,
            method::GET_TEST_VP,
        ]
        .map(str::to_owned)
        .to_vec()
    }

    async fn call(&self, wallet: &Wallet, name: &str, args: Args) -> Result<Value, WalletError> {
        match name {
            method::STORE_CREDENTIAL_VIA_CHAPI_DID_AUTH => {
                let credential: Value = argument(name, &args, 0)?;
                let result = self
                    .store_credential_via_did_auth(wallet, credential)
                    .await?;
                to_value(name, result)
            }
            method::STORE_PRESENTATION_VIA_CHAPI => {
                let presentation: Value = argument(name, &args, 0)?;
                Ok(self
                    .handler
                    .store(presentation)
                    .await?
                    .unwrap_or(Value::Null))
            }
            _ => Err(WalletError::MethodNotFound(name.to_owned())),
        }
    }
}
