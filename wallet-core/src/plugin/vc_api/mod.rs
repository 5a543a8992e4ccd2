//! Remote issuance and verification through a W3C VC-API service.
//!
//! Shadows the signing methods. Unsigned documents are still checked against the local
//! schemas before anything is sent.
//!
//! `verifyCredential` does not delegate, so plugins added before this one never see the
//! call. Add the expiration plugin after it to keep the local date check.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::{
    container::{argument, method, to_value, Args, Plugin, Wallet},
    error::WalletError,
    model::{SigningOptions, VerificationCheck, VerificationOptions},
    plugin::signing::schema::Schemas,
};


pub const PLUGIN_NAME: &str = "vc-api";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcApiParams {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Verification response, every list optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VerificationResponse {
    checks: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl From<VerificationResponse> for VerificationCheck {
    fn from(response: VerificationResponse) -> Self {
        Self {
            checks: response.checks,
            warnings: response.warnings,
            errors: response.errors,
        }
    }
}

pub struct VcApiPlugin {
    client: reqwest::Client,
    url: String,
    schemas: Schemas,
}

impl VcApiPlugin {
    pub fn new(params: VcApiParams) -> Result<Self, WalletError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(params.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: params.url.trim_end_matches('/').to_owned(),
            schemas: Schemas::new()?,
        })
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, WalletError> {
        let url = format!("{}{path}", self.url);
        tracing::debug!(%url, "vc-api request");

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WalletError::Network(format!("`{url}` responded {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| WalletError::External(format!("Invalid response from `{url}`: {e}")))
    }

    async fn issue_credential(
        &self,
        credential: Value,
        options: Option<SigningOptions>,
    ) -> Result<Value, WalletError> {
        self.schemas.validate_credential(&credential)?;

        let response: Value = self
            .post(
                "/credentials/issue",
                json!({ "credential": credential, "options": options.unwrap_or_default() }),
            )
            .await?;

        Ok(unwrap_field(response, "verifiableCredential"))
    }

    async fn issue_presentation(
        &self,
        presentation: Value,
        options: Option<SigningOptions>,
    ) -> Result<Value, WalletError> {
        self.schemas.validate_presentation(&presentation)?;

        let response: Value = self
            .post(
                "/presentations/prove",
                json!({ "presentation": presentation, "options": options.unwrap_or_default() }),
            )
            .await?;

        Ok(unwrap_field(response, "verifiablePresentation"))
    }

    async fn verify(
        &self,
        path: &str,
        field: &str,
        document: Value,
        options: Option<VerificationOptions>,
    ) -> Result<VerificationCheck, WalletError> {
        let mut body = serde_json::Map::new();
        body.insert(field.to_owned(), document);
        body.insert("options".to_owned(), json!(options.unwrap_or_default()));

        let response: VerificationResponse = self.post(path, Value::Object(body)).await?;

        Ok(response.into())
    }
}

/// Services answer either with the bare document or wrapped in `field`.
fn unwrap_field(mut response: Value, field: &str) -> Value {
    match response.get_mut(field) {
        Some(document) => document.take(),
        None => response,
    }
}

#[async_trait]
impl Plugin for VcApiPlugin {
    fn name(&self) -> String {
        PLUGIN_NAME.to_owned()
    }

    fn methods(&self) -> Vec<String> {
        [
            method::ISSUE_CREDENTIAL,
            method::VERIFY_CREDENTIAL,
            method::ISSUE_PRESENTATION,
            method::VERIFY_PRESENTATION,
        ]
        .map(str::to_owned)
        .to_vec()
    }

    async fn call(&self, _wallet: &Wallet, name: &str, args: Args) -> Result<Value, WalletError> {
        let document: Value = argument(name, &args, 0)?;

        match name {
            method::ISSUE_CREDENTIAL => {
                self.issue_credential(document, argument(name, &args, 1)?)
                    .await
            }
            method::ISSUE_PRESENTATION => {
                self.issue_presentation(document, argument(name, &args, 1)?)
                    .await
            }
            method::VERIFY_CREDENTIAL => {
                let result = self
                    .verify(
                        "/credentials/verify",
                        "verifiableCredential",
                        document,
                        argument(name, &args, 1)?,
                    )
                    .await?;
                to_value(name, result)
            }
            method::VERIFY_PRESENTATION => {
                let result = self
                    .verify(
                        "/presentations/verify",
                        "verifiablePresentation",
                        document,
                        argument(name, &args, 1)?,
                    )
                    .await?;
                to_value(name, result)
            }
            _ => Err(WalletError::MethodNotFound(name.to_owned())),
        }
    }
}
