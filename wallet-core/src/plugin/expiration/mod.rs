//! Expiration checks layered over `verifyCredential`.

use async_trait::async_trait;
use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use wallet_providers::credential_formatter::imp::jwt_formatter;

use crate::{
    container::{argument, method, to_value, Args, Plugin, Wallet},
    error::WalletError,
    model::{VerificationCheck, CHECK_EXPIRATION},
};


pub const PLUGIN_NAME: &str = "expiration";

const EXPIRED: &str = "expiration error: Credential is expired";
const INVALID_DATE: &str = "expiration error: Invalid expiration date";

pub struct ExpirationPlugin;

#[derive(Debug, PartialEq, Eq)]
enum Expiration {
    Never,
    At(OffsetDateTime),
    Invalid,
}

fn parse_date(value: &Value) -> Expiration {
    value
        .as_str()
        .and_then(|date| OffsetDateTime::parse(date, &Rfc3339).ok())
        .map_or(Expiration::Invalid, Expiration::At)
}

/// `expirationDate` (VCDM 1.1) wins over `validUntil` (VCDM 2).
fn document_expiration(credential: &Value) -> Expiration {
    ["expirationDate", "validUntil"]
        .iter()
        .find_map(|field| credential.get(field))
        .map_or(Expiration::Never, parse_date)
}

async fn expiration(credential: &Value) -> Expiration {
    match credential {
        Value::String(token) if jwt_formatter::is_jwt(token) => {
            match jwt_formatter::extract_credential(token, None).await {
                Ok(jwt) => match jwt.payload.expires_at {
                    Some(expires_at) => Expiration::At(expires_at),
                    None => document_expiration(&Value::Object(jwt.payload.custom.vc)),
                },
                Err(_) => Expiration::Invalid,
            }
        }
        credential => document_expiration(credential),
    }
}

impl ExpirationPlugin {
    async fn verify_credential(
        &self,
        wallet: &Wallet,
        args: Args,
    ) -> Result<VerificationCheck, WalletError> {
        let name = method::VERIFY_CREDENTIAL;
        let credential: Value = argument(name, &args, 0)?;

        let result = wallet.call_previous(PLUGIN_NAME, name, args).await?;
        let mut result: VerificationCheck =
            serde_json::from_value(result).map_err(|e| WalletError::InvalidArguments {
                method: name.to_owned(),
                reason: format!("result: {e}"),
            })?;

        match expiration(&credential).await {
            Expiration::Never => {}
            Expiration::At(date) if date <= OffsetDateTime::now_utc() => result.error(EXPIRED),
            Expiration::At(_) => result.check(CHECK_EXPIRATION),
            Expiration::Invalid => result.error(INVALID_DATE),
        }

        Ok(result)
    }
}

#[async_trait]
impl Plugin for ExpirationPlugin {
    fn name(&self) -> String {
        PLUGIN_NAME.to_owned()
    }

    fn methods(&self) -> Vec<String> {
        vec![method::VERIFY_CREDENTIAL.to_owned()]
    }

    fn dependent_methods(&self) -> Vec<String> {
        vec![method::VERIFY_CREDENTIAL.to_owned()]
    }

    async fn call(&self, wallet: &Wallet, name: &str, args: Args) -> Result<Value, WalletError> {
        match name {
            method::VERIFY_CREDENTIAL => {
                to_value(name, self.verify_credential(wallet, args).await?)
            }
            _ => Err(WalletError::MethodNotFound(name.to_owned())),
        }
    }
}
