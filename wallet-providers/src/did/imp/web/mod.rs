//! did:web resolution. Creation is not possible, the document lives on the controller's host.

use std::{borrow::Cow, time::Duration};

use async_trait::async_trait;
use url::Url;

use crate::{
    common_models::did::DidValue,
    did::{
        error::DidMethodError,
        model::{DidDocument, DidKey},
        DidMethod,
    },
};

#[cfg(test)]
mod test;

const PREFIX: &str = "did:web:";

#[derive(Debug, Clone)]
pub struct Params {
    /// Fetch over plain http; only meant for local test servers.
    pub use_http: bool,
    pub timeout: Duration,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            use_http: false,
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct WebDidMethod {
    client: reqwest::Client,
    use_http: bool,
}

impl WebDidMethod {
    pub fn new(params: Params) -> Result<Self, DidMethodError> {
        let client = reqwest::Client::builder()
            .timeout(params.timeout)
            .build()
            .map_err(|e| DidMethodError::CouldNotCreate(e.to_string()))?;

        Ok(Self {
            client,
            use_http: params.use_http,
        })
    }

    async fn fetch(&self, url: Url) -> Result<DidDocument, DidMethodError> {
        let failed = |e: reqwest::Error| {
            DidMethodError::ResolutionError(format!("Fetching did:web document failed: {e}"))
        };

        self.client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(failed)?
            .json()
            .await
            .map_err(failed)
    }
}

#[async_trait]
impl DidMethod for WebDidMethod {
    async fn create(&self, _key: &DidKey) -> Result<DidValue, DidMethodError> {
        Err(DidMethodError::NotSupported)
    }

    async fn resolve(&self, did_value: &DidValue) -> Result<DidDocument, DidMethodError> {
        let url = document_url(did_value, self.use_http)?;
        tracing::debug!(%url, "fetching did:web document");

        self.fetch(url).await
    }
}

/// `did:web:<host>[%3Aport][:path...]` to `https://<host>[:port]/<path...>/did.json`.
///
/// Every component is percent-decoded before it is placed in the URL. Without path segments
/// the document is expected under `/.well-known/`.
fn document_url(did_value: &DidValue, use_http: bool) -> Result<Url, DidMethodError> {
    let invalid = |reason: &str| {
        DidMethodError::ResolutionError(format!("Invalid did:web `{did_value}`: {reason}"))
    };
    let decode = |component: &str| {
        urlencoding::decode(component)
            .map(Cow::into_owned)
            .map_err(|e| invalid(&e.to_string()))
    };

    let mut parts = did_value
        .as_str()
        .strip_prefix(PREFIX)
        .ok_or_else(|| invalid("wrong method"))?
        .split(':');

    let host = parts
        .next()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| invalid("missing host"))
        .and_then(decode)?;
    let scheme = if use_http { "http" } else { "https" };

    let mut url = Url::parse(&format!("{scheme}://{host}/")).map_err(|e| invalid(&e.to_string()))?;

    let mut path = parts.map(decode).collect::<Result<Vec<_>, _>>()?;
    if path.is_empty() {
        path.push(".well-known".to_owned());
    }

    url.path_segments_mut()
        .map_err(|_| invalid("host cannot carry a path"))?
        .pop_if_empty()
        .extend(&path)
        .push("did.json");

    Ok(url)
}
