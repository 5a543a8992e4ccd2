//! Credential publishing and the title index.
//!
//! Published credentials are encrypted to the wallet (and any configured extra recipients)
//! with the storage URI bound as JWE `aad`, so a blob moved to another id does not decrypt.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::{json, Value};
use wallet_providers::{
    cache_storage::{in_memory::InMemoryCacheStorage, CacheKind},
    caching_loader::{CachingLoader, Resolver},
    credential_formatter::imp::jwt_formatter,
    jwe::model::Jwe,
    storage::{
        model::{IndexEntry, StorageUri, CREDENTIAL_RESOURCE},
        ContentStore, CredentialIndex,
    },
};

use crate::{
    config::CacheEntityConfig,
    container::{argument, method, to_value, Args, Plugin, Wallet},
    error::WalletError,
    model::{EncryptionOptions, SigningOptions},
    plugin::signing::schema::VCDM_1_1_CONTEXT,
};


pub const PLUGIN_NAME: &str = "vc";

const TEST_CREDENTIAL_ID: &str = "http://example.org/credentials/3731";
const TEST_ISSUANCE_DATE: &str = "2020-08-19T21:41:50Z";
const TEST_SUBJECT: &str = "did:example:d23dd687a7dc6787646f2eb98d0";

#[derive(Debug, Clone)]
pub struct Params {
    pub uri_namespace: String,
    /// Readers of every published credential besides the wallet itself.
    pub extra_recipients: Vec<String>,
    pub cache: CacheEntityConfig,
}

pub struct VcPlugin {
    params: Params,
    content_store: Arc<dyn ContentStore>,
    credential_index: Arc<dyn CredentialIndex>,
    cache: CachingLoader<WalletError>,
}

impl VcPlugin {
    pub fn new(
        params: Params,
        content_store: Arc<dyn ContentStore>,
        credential_index: Arc<dyn CredentialIndex>,
    ) -> Self {
        let cache = CachingLoader::new(
            CacheKind::Credential,
            Arc::new(InMemoryCacheStorage::new(HashMap::new())),
            params.cache.cache_size,
            params.cache.cache_refresh_timeout(),
            params.cache.refresh_after(),
        );

        Self {
            params,
            content_store,
            credential_index,
            cache,
        }
    }

    fn parse_uri(&self, uri: &str) -> Result<StorageUri, WalletError> {
        Ok(StorageUri::parse(uri, &self.params.uri_namespace)?)
    }

    async fn get_test_vc(
        &self,
        wallet: &Wallet,
        subject: Option<String>,
    ) -> Result<Value, WalletError> {
        let did = wallet.id()?.did(None)?;

        Ok(json!({
            "@context": [VCDM_1_1_CONTEXT],
            "id": TEST_CREDENTIAL_ID,
            "type": ["VerifiableCredential"],
            "issuer": did,
            "issuanceDate": TEST_ISSUANCE_DATE,
            "credentialSubject": {
                "id": subject.as_deref().unwrap_or(TEST_SUBJECT)
            }
        }))
    }

    async fn get_test_vp(
        &self,
        wallet: &Wallet,
        credential: Option<Value>,
    ) -> Result<Value, WalletError> {
        let did = wallet.id()?.did(None)?;

        let credential = match credential {
            Some(credential) => credential,
            None => {
                let unsigned = wallet.invoke().get_test_vc(None).await?;
                wallet.invoke().issue_credential(&unsigned, None).await?
            }
        };

        Ok(json!({
            "@context": [VCDM_1_1_CONTEXT],
            "type": ["VerifiablePresentation"],
            "holder": did,
            "verifiableCredential": [credential]
        }))
    }

    async fn get_did_auth_vp(
        &self,
        wallet: &Wallet,
        options: SigningOptions,
    ) -> Result<Value, WalletError> {
        let did = wallet.id()?.did(None)?;

        let presentation = json!({
            "@context": [VCDM_1_1_CONTEXT],
            "type": ["VerifiablePresentation"],
            "holder": did
        });
        let options = SigningOptions {
            proof_purpose: Some("authentication".to_owned()),
            ..options
        };

        wallet
            .invoke()
            .issue_presentation(&presentation, Some(&options))
            .await
    }

    async fn publish_credential(
        &self,
        wallet: &Wallet,
        credential: Value,
    ) -> Result<String, WalletError> {
        if !is_signed(&credential) {
            return Err(WalletError::validation("Credential is not signed"));
        }

        let uri = StorageUri::new(&self.params.uri_namespace, CREDENTIAL_RESOURCE).to_string();

        let jwe = wallet
            .invoke()
            .encrypt_object(
                &credential,
                &self.params.extra_recipients,
                Some(&EncryptionOptions {
                    aad: Some(uri.to_owned()),
                }),
            )
            .await?;
        let content = serde_json::to_vec(&jwe).map_err(|e| WalletError::Encryption(e.to_string()))?;

        self.content_store.put(&uri, content).await?;

        tracing::debug!(%uri, "credential published");

        Ok(uri)
    }

    async fn read_from_content_store(
        &self,
        wallet: &Wallet,
        uri: &str,
    ) -> Result<Value, WalletError> {
        self.parse_uri(uri)?;

        let resolver = ContentStoreResolver {
            wallet,
            content_store: self.content_store.as_ref(),
        };
        let content = self.cache.resolve(uri, &resolver).await?;

        serde_json::from_slice(&content).map_err(|e| WalletError::Storage(e.to_string()))
    }

    async fn add_credential(&self, title: String, uri: String) -> Result<(), WalletError> {
        self.parse_uri(&uri)?;

        self.credential_index
            .insert(IndexEntry { title, uri })
            .await?;

        Ok(())
    }

    async fn get_credential(&self, wallet: &Wallet, title: &str) -> Result<Value, WalletError> {
        let entry = self
            .credential_index
            .get(title)
            .await?
            .ok_or_else(|| WalletError::NotFound(title.to_owned()))?;

        self.read_from_content_store(wallet, &entry.uri).await
    }

    async fn get_credentials(&self, wallet: &Wallet) -> Result<Vec<Value>, WalletError> {
        let mut credentials = vec![];
        for entry in self.credential_index.list().await? {
            credentials.push(self.read_from_content_store(wallet, &entry.uri).await?);
        }

        Ok(credentials)
    }

    /// The new entry is inserted before the old one is removed, so a taken title leaves the
    /// index unchanged.
    async fn relabel_credential(&self, title: &str, new_title: String) -> Result<(), WalletError> {
        let entry = self
            .credential_index
            .get(title)
            .await?
            .ok_or_else(|| WalletError::NotFound(title.to_owned()))?;

        if entry.title == new_title {
            return Ok(());
        }

        self.credential_index
            .insert(IndexEntry {
                title: new_title,
                uri: entry.uri,
            })
            .await?;
        self.credential_index.remove(title).await?;

        Ok(())
    }
}

/// Embedded proof or compact JWT.
fn is_signed(credential: &Value) -> bool {
    match credential {
        Value::String(token) => jwt_formatter::is_jwt(token),
        Value::Object(object) => object.get("proof").is_some_and(|proof| !proof.is_null()),
        _ => false,
    }
}

/// Fetches and decrypts a published blob on a cache miss.
struct ContentStoreResolver<'a> {
    wallet: &'a Wallet,
    content_store: &'a dyn ContentStore,
}

#[async_trait]
impl Resolver for ContentStoreResolver<'_> {
    type Error = WalletError;

    async fn do_resolve(&self, uri: &str) -> Result<Vec<u8>, WalletError> {
        let content = self
            .content_store
            .get(uri)
            .await?
            .ok_or_else(|| WalletError::NotFound(uri.to_owned()))?;

        let jwe: Jwe = serde_json::from_slice(&content).map_err(|_| WalletError::Decryption)?;

        let credential = self
            .wallet
            .invoke()
            .decrypt_object(
                &jwe,
                Some(&EncryptionOptions {
                    aad: Some(uri.to_owned()),
                }),
            )
            .await
            .map_err(|_| WalletError::Decryption)?;

        serde_json::to_vec(&credential).map_err(|e| WalletError::Storage(e.to_string()))
    }
}

#[async_trait]
impl Plugin for VcPlugin {
    fn name(&self) -> String {
        PLUGIN_NAME.to_owned()
    }

    fn methods(&self) -> Vec<String> {
        [
            method::GET_TEST_VC,
            method::GET_TEST_VP,
            method::GET_DID_AUTH_VP,
            method::PUBLISH_CREDENTIAL,
            method::READ_FROM_CONTENT_STORE,
            method::READ_FROM_CERAMIC,
            method::ADD_CREDENTIAL,
            method::GET_CREDENTIAL,
            method::GET_CREDENTIALS,
            method::GET_CREDENTIALS_LIST,
            method::REMOVE_CREDENTIAL,
            method::RELABEL_CREDENTIAL,
        ]
        .map(str::to_owned)
        .to_vec()
    }

    fn dependent_methods(&self) -> Vec<String> {
        [
            method::ISSUE_CREDENTIAL,
            method::ISSUE_PRESENTATION,
            method::VERIFY_CREDENTIAL,
        ]
        .map(str::to_owned)
        .to_vec()
    }

    async fn call(&self, wallet: &Wallet, name: &str, args: Args) -> Result<Value, WalletError> {
        match name {
            method::GET_TEST_VC => {
                let subject: Option<String> = argument(name, &args, 0)?;
                self.get_test_vc(wallet, subject).await
            }
            method::GET_TEST_VP => {
                let credential: Option<Value> = argument(name, &args, 0)?;
                self.get_test_vp(wallet, credential).await
            }
            method::GET_DID_AUTH_VP => {
                let options: Option<SigningOptions> = argument(name, &args, 0)?;
                self.get_did_auth_vp(wallet, options.unwrap_or_default())
                    .await
            }
            method::PUBLISH_CREDENTIAL => {
                let credential: Value = argument(name, &args, 0)?;
                to_value(name, self.publish_credential(wallet, credential).await?)
            }
            method::READ_FROM_CONTENT_STORE | method::READ_FROM_CERAMIC => {
                let uri: String = argument(name, &args, 0)?;
                self.read_from_content_store(wallet, &uri).await
            }
            method::ADD_CREDENTIAL => {
                let title: String = argument(name, &args, 0)?;
                let uri: String = argument(name, &args, 1)?;

                self.add_credential(title, uri).await?;
                Ok(Value::Null)
            }
            method::GET_CREDENTIAL => {
                let title: String = argument(name, &args, 0)?;
                self.get_credential(wallet, &title).await
            }
            method::GET_CREDENTIALS => to_value(name, self.get_credentials(wallet).await?),
            method::GET_CREDENTIALS_LIST => {
                to_value(name, self.credential_index.list().await?)
            }
            method::REMOVE_CREDENTIAL => {
                let title: String = argument(name, &args, 0)?;
                to_value(name, self.credential_index.remove(&title).await?)
            }
            method::RELABEL_CREDENTIAL => {
                let title: String = argument(name, &args, 0)?;
                let new_title: String = argument(name, &args, 1)?;

                self.relabel_credential(&title, new_title).await?;
                Ok(Value::Null)
            }
            _ => Err(WalletError::MethodNotFound(name.to_owned())),
        }
    }
}
