//! Enumerates errors for credential formatting.

use thiserror::Error;

use wallet_crypto::CryptoProviderError;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum FormatterError {
    #[error("Failed: `{0}`")]
    Failed(String),
    #[error("Could not sign: `{0}`")]
    CouldNotSign(String),
    #[error("Could not verify: `{0}`")]
    CouldNotVerify(String),
    #[error("Could not format: `{0}`")]
    CouldNotFormat(String),
    #[error("Could not extract credentials: `{0}`")]
    CouldNotExtractCredentials(String),
    #[error("Could not extract presentation: `{0}`")]
    CouldNotExtractPresentation(String),
    #[error("Incorrect signature")]
    IncorrectSignature,
    #[error("Missing proof")]
    MissingProof,
    #[error("Unsupported cryptosuite: `{0}`")]
    UnsupportedCryptosuite(String),
    #[error("Missing issuer")]
    MissingIssuer,
    #[error("Crypto library error: `{0}`")]
    CryptoError(#[from] CryptoProviderError),
    #[error("JSON mapping error: `{0}`")]
    JsonMapping(String),
}
