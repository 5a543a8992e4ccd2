//! The **wallet core** issues, holds, presents and verifies W3C verifiable credentials.
//!
//! A [`Wallet`] is composed from plugins. Each plugin contributes named methods and may
//! call methods of other plugins through the wallet it is handed, so features stack:
//!
//! * **Signing** issues and verifies Data Integrity and JWT proofs, resolves DIDs and
//!   owns the raw JWE operations
//! * **DID/Key** derives the wallet identity from a seed
//! * **VC** publishes encrypted credentials to a content store and indexes them by title
//! * **Encryption** encrypts JSON objects to DIDs
//! * **Expiration** adds date checks on top of credential verification
//! * **CHAPI**, **VC-API**, **Signing Authority** and **Claimable Boosts** adapt external
//!   collaborators
//!
//! ## Getting started
//!
//! ```ignore rust
//! let wallet = init_wallet(&seed, &WalletConfig::default(), WalletServices::default()).await?;
//!
//! let credential = wallet.invoke().get_test_vc(Some("did:example:1234")).await?;
//! let signed = wallet.invoke().issue_credential(&credential, None).await?;
//! let result = wallet.invoke().verify_credential(&signed, None).await?;
//! assert!(result.is_verified());
//! ```
//!
//! Protocol-level building blocks live in `wallet-providers`, raw primitives in
//! `wallet-crypto`.

use std::{collections::HashMap, sync::Arc, time::Duration};

use config::WalletConfig;
use model::SigningEngine;
use wallet_crypto::{
    imp::{
        hasher::sha256::SHA256,
        signer::{
            eddsa::{NativeEddsaSigner, PortableEddsaSigner},
            es256::ES256Signer,
        },
        CryptoProviderImpl,
    },
    CryptoProvider, Signer,
};
use wallet_providers::{
    cache_storage::{in_memory::InMemoryCacheStorage, CacheKind},
    caching_loader::CachingLoader,
    did::{
        imp::{
            key::KeyDidMethod,
            provider::DidMethodProviderImpl,
            web::{Params as WebDidMethodParams, WebDidMethod},
        },
        provider::DidMethodProvider,
        DidMethod,
    },
    key_algorithm::{
        imp::{eddsa::Eddsa, es256::Es256, provider::KeyAlgorithmProviderImpl},
        model::KeyAlgorithmType,
        provider::KeyAlgorithmProvider,
        KeyAlgorithm,
    },
    storage::{
        imp::in_memory::{InMemoryContentStore, InMemoryCredentialIndex},
        ContentStore, CredentialIndex,
    },
};

use plugin::{
    did_key::DidKeyPlugin,
    encryption::EncryptionPlugin,
    expiration::ExpirationPlugin,
    signing::SigningPlugin,
    vc::{Params as VcParams, VcPlugin},
};

pub use cache::WalletCache;
pub use container::{Wallet, WalletBuilder};
pub use error::WalletError;

pub mod cache;
pub mod config;
pub mod container;
pub mod error;
pub mod model;
pub mod plugin;

pub const SHA_256: &str = "sha-256";
pub const DID_METHOD_KEY: &str = "KEY";
pub const DID_METHOD_WEB: &str = "WEB";

/// Providers shared by the bundled plugins.
#[derive(Clone)]
pub struct Providers {
    pub crypto: Arc<dyn CryptoProvider>,
    pub key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    pub did_method_provider: Arc<dyn DidMethodProvider>,
}

impl Providers {
    pub fn new(config: &WalletConfig) -> Result<Self, WalletError> {
        // initialize crypto provider
        let eddsa_signer: Arc<dyn Signer> = match config.signing.engine {
            SigningEngine::Portable => Arc::new(PortableEddsaSigner {}),
            SigningEngine::Native => Arc::new(NativeEddsaSigner {}),
        };
        let crypto = Arc::new(CryptoProviderImpl::new(
            HashMap::from_iter(vec![(SHA_256.to_string(), Arc::new(SHA256 {}) as _)]),
            HashMap::from_iter(vec![
                ("Ed25519".to_string(), eddsa_signer),
                ("ES256".to_string(), Arc::new(ES256Signer {}) as _),
            ]),
        ));

        // initialize key algorithm provider
        let key_algorithms: HashMap<String, Arc<dyn KeyAlgorithm>> = HashMap::from_iter(vec![
            (KeyAlgorithmType::Eddsa.to_string(), Arc::new(Eddsa) as _),
            (KeyAlgorithmType::Es256.to_string(), Arc::new(Es256) as _),
        ]);
        let key_algorithm_provider = Arc::new(KeyAlgorithmProviderImpl::new(
            key_algorithms,
            crypto.clone(),
        ));

        // initialize did method provider
        let did_methods: HashMap<String, Arc<dyn DidMethod>> = HashMap::from_iter(vec![
            (
                DID_METHOD_KEY.to_string(),
                Arc::new(KeyDidMethod::new(key_algorithm_provider.clone())) as _,
            ),
            (
                DID_METHOD_WEB.to_string(),
                Arc::new(WebDidMethod::new(WebDidMethodParams {
                    use_http: config.did_web.resolve_to_insecure_http,
                    timeout: Duration::from_secs(config.did_web.timeout_secs),
                })?) as _,
            ),
        ]);

        let did_caching_loader = CachingLoader::new(
            CacheKind::DidDocument,
            Arc::new(InMemoryCacheStorage::new(HashMap::new())),
            config.caching.did.cache_size,
            config.caching.did.cache_refresh_timeout(),
            config.caching.did.refresh_after(),
        );
        let did_method_provider =
            Arc::new(DidMethodProviderImpl::new(did_caching_loader, did_methods));

        Ok(Self {
            crypto,
            key_algorithm_provider,
            did_method_provider,
        })
    }
}

/// Storage collaborators of a wallet.
#[derive(Clone)]
pub struct WalletServices {
    pub content_store: Arc<dyn ContentStore>,
    pub credential_index: Arc<dyn CredentialIndex>,
}

impl Default for WalletServices {
    fn default() -> Self {
        Self {
            content_store: Arc::new(InMemoryContentStore::default()),
            credential_index: Arc::new(InMemoryCredentialIndex::default()),
        }
    }
}

/// Builds a wallet with the signing, DID/Key, VC, encryption and expiration plugins.
///
/// Protocol adapters are added by the caller with [`Wallet::add_plugin`].
pub async fn init_wallet(
    seed: &str,
    config: &WalletConfig,
    services: WalletServices,
) -> Result<Wallet, WalletError> {
    let providers = Providers::new(config)?;
    init_wallet_with_providers(seed, config, services, &providers).await
}

pub async fn init_wallet_with_providers(
    seed: &str,
    config: &WalletConfig,
    services: WalletServices,
    providers: &Providers,
) -> Result<Wallet, WalletError> {
    let signing = SigningPlugin::new(
        providers.crypto.clone(),
        providers.key_algorithm_provider.clone(),
        providers.did_method_provider.clone(),
        config.signing.default_proof_format,
    )?;
    let did_key = DidKeyPlugin::new(seed, providers.key_algorithm_provider.clone()).await?;
    let vc = VcPlugin::new(
        VcParams {
            uri_namespace: config.storage.uri_namespace.to_owned(),
            extra_recipients: config.storage.extra_recipients.to_owned(),
            cache: config.caching.credentials.to_owned(),
        },
        services.content_store,
        services.credential_index,
    );

    let wallet = WalletBuilder::new()
        .plugin(Arc::new(signing))
        .plugin(Arc::new(did_key))
        .plugin(Arc::new(vc))
        .plugin(Arc::new(EncryptionPlugin))
        .plugin(Arc::new(ExpirationPlugin))
        .build()?;

    tracing::debug!(plugins = ?wallet.plugin_names(), "wallet initialized");

    Ok(wallet)
}
