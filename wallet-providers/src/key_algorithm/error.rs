use thiserror::Error;
use wallet_crypto::{CryptoProviderError, SignerError};

#[derive(Debug, Error)]
pub enum KeyAlgorithmProviderError {
    #[error("Unknown key algorithm `{0}`")]
    UnknownAlgorithm(String),
    #[error(transparent)]
    Crypto(#[from] CryptoProviderError),
}

#[derive(Debug, Error)]
pub enum KeyAlgorithmError {
    #[error("Key algorithm error: `{0}`")]
    Failed(String),
    #[error(transparent)]
    Signer(#[from] SignerError),
    #[error("Not supported for `{0}`")]
    NotSupported(String),
}
