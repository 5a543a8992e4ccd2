//! Typed facade over [`Wallet::call`].

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use wallet_providers::{
    common_models::{did::DidValue, PublicKeyJwk},
    jwe::model::Jwe,
    storage::model::IndexEntry,
};

use super::{method, to_value, Args, Wallet};
use crate::{
    error::WalletError,
    model::{EncryptionOptions, SigningOptions, VerificationCheck, VerificationOptions},
    plugin::{
        chapi::ChapiStoreResult,
        signing_authority::model::{
            ClaimLink, ClaimLinkOptions, RegisteredSigningAuthority, SigningAuthority,
            SigningAuthorityEndpoint,
        },
    },
};

pub struct Invoke<'a> {
    wallet: &'a Wallet,
}

impl<'a> Invoke<'a> {
    pub(super) fn new(wallet: &'a Wallet) -> Self {
        Self { wallet }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, args: Args) -> Result<T, WalletError> {
        let result = self.wallet.call(method, args).await?;

        serde_json::from_value(result).map_err(|e| WalletError::InvalidArguments {
            method: method.to_owned(),
            reason: format!("result: {e}"),
        })
    }

    pub async fn issue_credential(
        &self,
        credential: &Value,
        options: Option<&SigningOptions>,
    ) -> Result<Value, WalletError> {
        let method = method::ISSUE_CREDENTIAL;
        self.call(method, vec![credential.clone(), to_value(method, options)?])
            .await
    }

    pub async fn verify_credential(
        &self,
        credential: &Value,
        options: Option<&VerificationOptions>,
    ) -> Result<VerificationCheck, WalletError> {
        let method = method::VERIFY_CREDENTIAL;
        self.call(method, vec![credential.clone(), to_value(method, options)?])
            .await
    }

    pub async fn issue_presentation(
        &self,
        presentation: &Value,
        options: Option<&SigningOptions>,
    ) -> Result<Value, WalletError> {
        let method = method::ISSUE_PRESENTATION;
        self.call(method, vec![presentation.clone(), to_value(method, options)?])
            .await
    }

    pub async fn verify_presentation(
        &self,
        presentation: &Value,
        options: Option<&VerificationOptions>,
    ) -> Result<VerificationCheck, WalletError> {
        let method = method::VERIFY_PRESENTATION;
        self.call(method, vec![presentation.clone(), to_value(method, options)?])
            .await
    }

    pub async fn resolve_did(
        &self,
        did: &str,
        input_metadata: Option<&Value>,
    ) -> Result<Value, WalletError> {
        let input_metadata = input_metadata.cloned().unwrap_or(Value::Null);
        self.call(method::RESOLVE_DID, vec![json!(did), input_metadata])
            .await
    }

    pub async fn did_to_verification_method(&self, did: &str) -> Result<String, WalletError> {
        self.call(method::DID_TO_VERIFICATION_METHOD, vec![json!(did)])
            .await
    }

    pub async fn create_jwe(
        &self,
        cleartext: &str,
        recipients: &[String],
        aad: Option<&str>,
    ) -> Result<Jwe, WalletError> {
        self.call(
            method::CREATE_JWE,
            vec![json!(cleartext), json!(recipients), json!(aad)],
        )
        .await
    }

    pub async fn decrypt_jwe(&self, jwe: &Jwe, aad: Option<&str>) -> Result<String, WalletError> {
        let method = method::DECRYPT_JWE;
        self.call(method, vec![to_value(method, jwe)?, json!(aad)])
            .await
    }

    pub async fn clear_did_cache(&self) -> Result<(), WalletError> {
        self.call(method::CLEAR_DID_CACHE, vec![]).await
    }

    pub async fn get_subject_did(&self, method: Option<&str>) -> Result<DidValue, WalletError> {
        self.call(method::GET_SUBJECT_DID, vec![json!(method)])
            .await
    }

    /// Public JWK only.
    pub async fn get_subject_keypair(
        &self,
        algorithm: Option<&str>,
    ) -> Result<PublicKeyJwk, WalletError> {
        self.call(method::GET_SUBJECT_KEYPAIR, vec![json!(algorithm)])
            .await
    }

    pub async fn get_test_vc(&self, subject: Option<&str>) -> Result<Value, WalletError> {
        self.call(method::GET_TEST_VC, vec![json!(subject)]).await
    }

    pub async fn get_test_vp(&self, credential: Option<&Value>) -> Result<Value, WalletError> {
        self.call(method::GET_TEST_VP, vec![json!(credential)])
            .await
    }

    pub async fn get_did_auth_vp(
        &self,
        options: Option<&SigningOptions>,
    ) -> Result<Value, WalletError> {
        let method = method::GET_DID_AUTH_VP;
        self.call(method, vec![to_value(method, options)?]).await
    }

    /// Returns the storage URI.
    pub async fn publish_credential(&self, credential: &Value) -> Result<String, WalletError> {
        self.call(method::PUBLISH_CREDENTIAL, vec![credential.clone()])
            .await
    }

    pub async fn read_from_content_store(&self, uri: &str) -> Result<Value, WalletError> {
        self.call(method::READ_FROM_CONTENT_STORE, vec![json!(uri)])
            .await
    }

    pub async fn add_credential(&self, title: &str, uri: &str) -> Result<(), WalletError> {
        self.call(method::ADD_CREDENTIAL, vec![json!(title), json!(uri)])
            .await
    }

    pub async fn get_credential(&self, title: &str) -> Result<Value, WalletError> {
        self.call(method::GET_CREDENTIAL, vec![json!(title)])
            .await
    }

    pub async fn get_credentials(&self) -> Result<Vec<Value>, WalletError> {
        self.call(method::GET_CREDENTIALS, vec![]).await
    }

    pub async fn get_credentials_list(&self) -> Result<Vec<IndexEntry>, WalletError> {
        self.call(method::GET_CREDENTIALS_LIST, vec![]).await
    }

    pub async fn remove_credential(&self, title: &str) -> Result<bool, WalletError> {
        self.call(method::REMOVE_CREDENTIAL, vec![json!(title)])
            .await
    }

    pub async fn relabel_credential(&self, title: &str, new_title: &str) -> Result<(), WalletError> {
        self.call(
            method::RELABEL_CREDENTIAL,
            vec![json!(title), json!(new_title)],
        )
        .await
    }

    pub async fn encrypt_object(
        &self,
        payload: &Value,
        recipients: &[String],
        options: Option<&EncryptionOptions>,
    ) -> Result<Jwe, WalletError> {
        let method = method::ENCRYPT_OBJECT;
        self.call(
            method,
            vec![payload.clone(), json!(recipients), to_value(method, options)?],
        )
        .await
    }

    pub async fn decrypt_object(
        &self,
        jwe: &Jwe,
        options: Option<&EncryptionOptions>,
    ) -> Result<Value, WalletError> {
        let method = method::DECRYPT_OBJECT;
        self.call(
            method,
            vec![to_value(method, jwe)?, to_value(method, options)?],
        )
        .await
    }

    pub async fn store_credential_via_chapi_did_auth(
        &self,
        credential: &Value,
    ) -> Result<ChapiStoreResult, WalletError> {
        self.call(
            method::STORE_CREDENTIAL_VIA_CHAPI_DID_AUTH,
            vec![credential.clone()],
        )
        .await
    }

    pub async fn store_presentation_via_chapi(
        &self,
        presentation: &Value,
    ) -> Result<Value, WalletError> {
        self.call(
            method::STORE_PRESENTATION_VIA_CHAPI,
            vec![presentation.clone()],
        )
        .await
    }

    pub async fn create_signing_authority(
        &self,
        name: &str,
    ) -> Result<SigningAuthority, WalletError> {
        self.call(method::CREATE_SIGNING_AUTHORITY, vec![json!(name)])
            .await
    }

    pub async fn get_signing_authorities(&self) -> Result<Vec<SigningAuthority>, WalletError> {
        self.call(method::GET_SIGNING_AUTHORITIES, vec![]).await
    }

    pub async fn register_signing_authority(
        &self,
        endpoint: &str,
        name: &str,
        did: &str,
    ) -> Result<bool, WalletError> {
        self.call(
            method::REGISTER_SIGNING_AUTHORITY,
            vec![json!(endpoint), json!(name), json!(did)],
        )
        .await
    }

    pub async fn get_registered_signing_authorities(
        &self,
    ) -> Result<Vec<RegisteredSigningAuthority>, WalletError> {
        self.call(method::GET_REGISTERED_SIGNING_AUTHORITIES, vec![])
            .await
    }

    pub async fn get_registered_signing_authority(
        &self,
        endpoint: &str,
        name: &str,
    ) -> Result<Option<RegisteredSigningAuthority>, WalletError> {
        self.call(
            method::GET_REGISTERED_SIGNING_AUTHORITY,
            vec![json!(endpoint), json!(name)],
        )
        .await
    }

    pub async fn generate_claim_link(
        &self,
        boost_uri: &str,
        signing_authority: &SigningAuthorityEndpoint,
        options: Option<&ClaimLinkOptions>,
        challenge: Option<&str>,
    ) -> Result<ClaimLink, WalletError> {
        let method = method::GENERATE_CLAIM_LINK;
        self.call(
            method,
            vec![
                json!(boost_uri),
                to_value(method, signing_authority)?,
                to_value(method, options)?,
                json!(challenge),
            ],
        )
        .await
    }

    pub async fn generate_boost_claim_link(
        &self,
        boost_uri: &str,
        options: Option<&ClaimLinkOptions>,
        challenge: Option<&str>,
    ) -> Result<ClaimLink, WalletError> {
        let method = method::GENERATE_BOOST_CLAIM_LINK;
        self.call(
            method,
            vec![json!(boost_uri), to_value(method, options)?, json!(challenge)],
        )
        .await
    }
}
