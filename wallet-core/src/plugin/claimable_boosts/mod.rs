//! Claim links for boosts, signed by a dedicated signing authority.

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    container::{argument, method, to_value, Args, Plugin, Wallet},
    error::WalletError,
    plugin::signing_authority::model::{ClaimLink, ClaimLinkOptions, SigningAuthorityEndpoint},
};


pub const PLUGIN_NAME: &str = "claimable-boosts";

pub const DEFAULT_SIGNING_AUTHORITY_NAME: &str = "lc-claim-link-sa";

pub struct ClaimableBoostsPlugin;

impl ClaimableBoostsPlugin {
    /// Finds the registered authority named `name`, creating and registering it when missing.
    async fn signing_authority(
        &self,
        wallet: &Wallet,
        name: &str,
    ) -> Result<SigningAuthorityEndpoint, WalletError> {
        let invoke = wallet.invoke();

        if let Some(registered) = invoke
            .get_registered_signing_authorities()
            .await?
            .into_iter()
            .find(|registered| registered.name == name)
        {
            return Ok(registered.into());
        }

        let existing = invoke
            .get_signing_authorities()
            .await?
            .into_iter()
            .find(|authority| authority.name == name);

        let authority = match existing {
            Some(authority) => authority,
            None => invoke.create_signing_authority(name).await?,
        };

        let endpoint = authority.endpoint.ok_or_else(|| {
            WalletError::External(format!("Signing authority `{name}` has no endpoint"))
        })?;

        if !invoke
            .register_signing_authority(&endpoint, name, &authority.did)
            .await?
        {
            return Err(WalletError::External(format!(
                "Signing authority `{name}` was not registered"
            )));
        }

        tracing::info!(name, %endpoint, "claim link signing authority registered");

        Ok(SigningAuthorityEndpoint {
            endpoint,
            name: name.to_owned(),
            did: Some(authority.did),
        })
    }

    async fn generate_boost_claim_link(
        &self,
        wallet: &Wallet,
        boost_uri: String,
        options: Option<ClaimLinkOptions>,
        challenge: Option<String>,
    ) -> Result<ClaimLink, WalletError> {
        let mut options = options.unwrap_or_default();
        let name = options
            .signing_authority_name
            .take()
            .unwrap_or_else(|| DEFAULT_SIGNING_AUTHORITY_NAME.to_owned());

        let signing_authority = self.signing_authority(wallet, &name).await?;

        wallet
            .invoke()
            .generate_claim_link(
                &boost_uri,
                &signing_authority,
                Some(&options),
                challenge.as_deref(),
            )
            .await
    }
}

#[async_trait]
impl Plugin for ClaimableBoostsPlugin {
    fn name(&self) -> String {
        PLUGIN_NAME.to_owned()
    }

    fn methods(&self) -> Vec<String> {
        vec![method::GENERATE_BOOST_CLAIM_LINK.to_owned()]
    }

    fn dependent_methods(&self) -> Vec<String> {
        [
            method::GET_REGISTERED_SIGNING_AUTHORITIES,
            method::GET_SIGNING_AUTHORITIES,
            method::CREATE_SIGNING_AUTHORITY,
            method::REGISTER_SIGNING_AUTHORITY,
            method::GENERATE_CLAIM_LINK,
        ]
        .map(str::to_owned)
        .to_vec()
    }

    async fn call(&self, wallet: &Wallet, name: &str, args: Args) -> Result<Value, WalletError> {
        match name {
            method::GENERATE_BOOST_CLAIM_LINK => {
                let link = self
                    .generate_boost_claim_link(
                        wallet,
                        argument(name, &args, 0)?,
                        argument(name, &args, 1)?,
                        argument(name, &args, 2)?,
                    )
                    .await?;
                to_value(name, link)
            }
            _ => Err(WalletError::MethodNotFound(name.to_owned())),
        }
    }
}
