//! JSON object encryption to DIDs on top of the raw JWE methods.

use async_trait::async_trait;
use serde_json::Value;
use wallet_providers::jwe::model::Jwe;

use crate::{
    container::{argument, method, to_value, Args, Plugin, Wallet},
    error::WalletError,
    model::EncryptionOptions,
};


pub const PLUGIN_NAME: &str = "encryption";

pub struct EncryptionPlugin;

impl EncryptionPlugin {
    async fn encrypt_object(
        &self,
        wallet: &Wallet,
        payload: Value,
        recipients: Vec<String>,
        options: EncryptionOptions,
    ) -> Result<Jwe, WalletError> {
        let own_did = wallet.id()?.did(None)?.to_string();

        let mut unique: Vec<String> = Vec::with_capacity(recipients.len() + 1);
        for recipient in std::iter::once(own_did).chain(recipients) {
            if !unique.contains(&recipient) {
                unique.push(recipient);
            }
        }

        let cleartext =
            serde_json::to_string(&payload).map_err(|e| WalletError::Encryption(e.to_string()))?;

        tracing::debug!(recipients = unique.len(), "encrypting object");

        wallet
            .invoke()
            .create_jwe(&cleartext, &unique, options.aad.as_deref())
            .await
    }

    async fn decrypt_object(
        &self,
        wallet: &Wallet,
        jwe: Jwe,
        options: EncryptionOptions,
    ) -> Result<Value, WalletError> {
        let cleartext = wallet
            .invoke()
            .decrypt_jwe(&jwe, options.aad.as_deref())
            .await
            .map_err(|_| WalletError::Decryption)?;

        serde_json::from_str(&cleartext).map_err(|_| WalletError::Decryption)
    }
}

#[async_trait]
impl Plugin for EncryptionPlugin {
    fn name(&self) -> String {
        PLUGIN_NAME.to_owned()
    }

    fn methods(&self) -> Vec<String> {
        vec![
            method::ENCRYPT_OBJECT.to_owned(),
            method::DECRYPT_OBJECT.to_owned(),
        ]
    }

    fn dependent_methods(&self) -> Vec<String> {
        vec![method::CREATE_JWE.to_owned(), method::DECRYPT_JWE.to_owned()]
    }

    async fn call(&self, wallet: &Wallet, name: &str, args: Args) -> Result<Value, WalletError> {
        match name {
            method::ENCRYPT_OBJECT => {
                let payload: Value = argument(name, &args, 0)?;
                let recipients: Option<Vec<String>> = argument(name, &args, 1)?;
                let options: Option<EncryptionOptions> = argument(name, &args, 2)?;

                let jwe = self
                    .encrypt_object(
                        wallet,
                        payload,
                        recipients.unwrap_or_default(),
                        options.unwrap_or_default(),
                    )
                    .await?;
                to_value(name, jwe)
            }
            method::DECRYPT_OBJECT => {
                let jwe: Jwe = argument(name, &args, 0).map_err(|_| WalletError::Decryption)?;
                let options: Option<EncryptionOptions> = argument(name, &args, 1)?;

                self.decrypt_object(wallet, jwe, options.unwrap_or_default())
                    .await
            }
            _ => Err(WalletError::MethodNotFound(name.to_owned())),
        }
    }
}
