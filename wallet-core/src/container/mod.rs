//! Plugin composition.
//!
//! A [`Wallet`] is an immutable stack of plugins. Adding a plugin returns a new wallet and
//! leaves the receiver untouched. Every invocation is dispatched by name to the last added
//! plugin providing it, and that plugin gets the composed wallet so it can call methods
//! of plugins added after it. [`Wallet::call_previous`] reaches the implementation a
//! plugin shadows, which is how wrapping plugins delegate.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use wallet_providers::common_models::did::DidValue;

use crate::{error::WalletError, model::Keypair};

pub use invoke::Invoke;

pub mod invoke;
pub mod method;

#[cfg(test)]
mod test;

pub type Args = Vec<Value>;

/// The wallet identity: DIDs and key pairs derived from one seed.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait IdCapability: Send + Sync {
    /// `None` or `key` for Ed25519 `did:key`, `key:p256` for P-256.
    fn did(&self, method: Option<String>) -> Result<DidValue, WalletError>;

    /// `None` for Ed25519.
    fn keypair(&self, algorithm: Option<String>) -> Result<Keypair, WalletError>;
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique within a wallet.
    fn name(&self) -> String;

    /// Invocation names this plugin provides.
    fn methods(&self) -> Vec<String>;

    /// Invocation names that must be provided by earlier plugins.
    fn dependent_methods(&self) -> Vec<String> {
        vec![]
    }

    fn id(&self) -> Option<Arc<dyn IdCapability>> {
        None
    }

    async fn call(&self, wallet: &Wallet, method: &str, args: Args) -> Result<Value, WalletError>;
}

#[derive(Clone, Default)]
struct WalletInner {
    plugins: Vec<Arc<dyn Plugin>>,
    /// Providers of each method in add order; the last one is active.
    methods: BTreeMap<String, Vec<usize>>,
    id: Option<Arc<dyn IdCapability>>,
}

#[derive(Clone, Default)]
pub struct Wallet {
    inner: Arc<WalletInner>,
}

impl Wallet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_plugin(&self, plugin: Arc<dyn Plugin>) -> Result<Wallet, WalletError> {
        let name = plugin.name();

        if self.inner.plugins.iter().any(|added| added.name() == name) {
            return Err(WalletError::DuplicatePlugin(name));
        }

        if let Some(method) = plugin
            .dependent_methods()
            .into_iter()
            .find(|method| !self.inner.methods.contains_key(method))
        {
            return Err(WalletError::MissingDependency {
                plugin: name,
                method,
            });
        }

        let mut inner = WalletInner::clone(&self.inner);
        let index = inner.plugins.len();

        let methods = plugin.methods();
        for method in &methods {
            inner
                .methods
                .entry(method.to_owned())
                .or_default()
                .push(index);
        }

        if let Some(id) = plugin.id() {
            inner.id = Some(id);
        }

        inner.plugins.push(plugin);

        tracing::debug!(plugin = %name, methods = methods.len(), "plugin added");

        Ok(Wallet {
            inner: Arc::new(inner),
        })
    }

    pub async fn call(&self, method: &str, args: Args) -> Result<Value, WalletError> {
        let plugin = self
            .inner
            .methods
            .get(method)
            .and_then(|providers| providers.last())
            .and_then(|index| self.inner.plugins.get(*index))
            .ok_or_else(|| WalletError::MethodNotFound(method.to_owned()))?;

        tracing::trace!(method, plugin = %plugin.name(), "dispatch");

        plugin.call(self, method, args).await
    }

    /// Calls the implementation of `method` that `plugin_name` shadows.
    pub async fn call_previous(
        &self,
        plugin_name: &str,
        method: &str,
        args: Args,
    ) -> Result<Value, WalletError> {
        let providers = self
            .inner
            .methods
            .get(method)
            .ok_or_else(|| WalletError::MethodNotFound(method.to_owned()))?;

        let plugin = providers
            .iter()
            .rposition(|index| {
                self.inner
                    .plugins
                    .get(*index)
                    .is_some_and(|plugin| plugin.name() == plugin_name)
            })
            .and_then(|position| position.checked_sub(1))
            .and_then(|position| providers.get(position))
            .and_then(|index| self.inner.plugins.get(*index))
            .ok_or_else(|| WalletError::MethodNotFound(method.to_owned()))?;

        tracing::trace!(method, plugin = %plugin.name(), shadowed_by = plugin_name, "dispatch");

        plugin.call(self, method, args).await
    }

    pub fn invoke(&self) -> Invoke<'_> {
        Invoke::new(self)
    }

    pub fn id(&self) -> Result<Arc<dyn IdCapability>, WalletError> {
        self.inner.id.clone().ok_or(WalletError::MissingIdentity)
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.inner.methods.contains_key(method)
    }

    /// All invocable method names in order.
    pub fn methods(&self) -> Vec<&str> {
        self.inner.methods.keys().map(String::as_str).collect()
    }

    pub fn plugin_names(&self) -> Vec<String> {
        self.inner.plugins.iter().map(|plugin| plugin.name()).collect()
    }
}

/// Adds plugins in order.
#[derive(Default)]
pub struct WalletBuilder {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl WalletBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn build(self) -> Result<Wallet, WalletError> {
        self.plugins
            .into_iter()
            .try_fold(Wallet::empty(), |wallet, plugin| wallet.add_plugin(plugin))
    }
}

/// Decodes the positional argument `index`. A missing argument decodes from `null`.
pub fn argument<T: DeserializeOwned>(
    method: &str,
    args: &[Value],
    index: usize,
) -> Result<T, WalletError> {
    let value = args.get(index).cloned().unwrap_or(Value::Null);

    serde_json::from_value(value).map_err(|e| WalletError::InvalidArguments {
        method: method.to_owned(),
        reason: format!("argument {index}: {e}"),
    })
}

pub fn to_value<T: Serialize>(method: &str, value: T) -> Result<Value, WalletError> {
    serde_json::to_value(value).map_err(|e| WalletError::InvalidArguments {
        method: method.to_owned(),
        reason: e.to_string(),
    })
}
