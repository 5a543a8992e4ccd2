//! Signing authorities and claim links, backed by an external [`SigningAuthorityService`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use self::model::{
    ClaimLink, ClaimLinkOptions, RegisteredSigningAuthority, SigningAuthority,
    SigningAuthorityEndpoint,
};
use crate::{
    container::{argument, method, to_value, Args, Plugin, Wallet},
    error::WalletError,
};

pub mod model;


pub const PLUGIN_NAME: &str = "signing-authority";

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SigningAuthorityService: Send + Sync {
    async fn create_signing_authority(&self, name: String)
        -> Result<SigningAuthority, WalletError>;

    async fn get_signing_authorities(&self) -> Result<Vec<SigningAuthority>, WalletError>;

    async fn register_signing_authority(
        &self,
        endpoint: String,
        name: String,
        did: String,
    ) -> Result<bool, WalletError>;

    async fn get_registered_signing_authorities(
        &self,
    ) -> Result<Vec<RegisteredSigningAuthority>, WalletError>;

    async fn get_registered_signing_authority(
        &self,
        endpoint: String,
        name: String,
    ) -> Result<Option<RegisteredSigningAuthority>, WalletError>;

    async fn generate_claim_link(
        &self,
        boost_uri: String,
        signing_authority: SigningAuthorityEndpoint,
        options: Option<ClaimLinkOptions>,
        challenge: Option<String>,
    ) -> Result<ClaimLink, WalletError>;
}

pub struct SigningAuthorityPlugin {
    service: Arc<dyn SigningAuthorityService>,
}

impl SigningAuthorityPlugin {
    pub fn new(service: Arc<dyn SigningAuthorityService>) -> Self {
        Self { service }
    }
}

/// Lowercase letters, digits and hyphens.
fn validate_name(name: &str) -> Result<(), WalletError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if !valid {
        return Err(WalletError::validation(format!(
            "/name: `{name}` must contain only lowercase letters, numbers, and hyphens"
        )));
    }

    Ok(())
}

#[async_trait]
impl Plugin for SigningAuthorityPlugin {
    fn name(&self) -> String {
        PLUGIN_NAME.to_owned()
    }

    fn methods(&self) -> Vec<String> {
        [
            method::CREATE_SIGNING_AUTHORITY,
            method::GET_SIGNING_AUTHORITIES,
            method::REGISTER_SIGNING_AUTHORITY,
            method::GET_REGISTERED_SIGNING_AUTHORITIES,
            method::GET_REGISTERED_SIGNING_AUTHORITY,
            method::GENERATE_CLAIM_LINK,
        ]
        .map(str::to_owned)
        .to_vec()
    }

    async fn call(&self, _wallet: &Wallet, name: &str, args: Args) -> Result<Value, WalletError> {
        match name {
            method::CREATE_SIGNING_AUTHORITY => {
                let authority: String = argument(name, &args, 0)?;
                validate_name(&authority)?;

                let created = self.service.create_signing_authority(authority).await?;
                tracing::debug!(name = %created.name, did = %created.did, "signing authority created");
                to_value(name, created)
            }
            method::GET_SIGNING_AUTHORITIES => {
                to_value(name, self.service.get_signing_authorities().await?)
            }
            method::REGISTER_SIGNING_AUTHORITY => {
                let endpoint: String = argument(name, &args, 0)?;
                let authority: String = argument(name, &args, 1)?;
                let did: String = argument(name, &args, 2)?;
                validate_name(&authority)?;

                let registered = self
                    .service
                    .register_signing_authority(endpoint, authority, did)
                    .await?;
                to_value(name, registered)
            }
            method::GET_REGISTERED_SIGNING_AUTHORITIES => {
                to_value(name, self.service.get_registered_signing_authorities().await?)
            }
            method::GET_REGISTERED_SIGNING_AUTHORITY => {
                let registered = self
                    .service
                    .get_registered_signing_authority(
                        argument(name, &args, 0)?,
                        argument(name, &args, 1)?,
                    )
                    .await?;
                to_value(name, registered)
            }
            method::GENERATE_CLAIM_LINK => {
                let link = self
                    .service
                    .generate_claim_link(
                        argument(name, &args, 0)?,
                        argument(name, &args, 1)?,
                        argument(name, &args, 2)?,
                        argument(name, &args, 3)?,
                    )
                    .await?;
                to_value(name, link)
            }
            _ => Err(WalletError::MethodNotFound(name.to_owned())),
        }
    }
}
