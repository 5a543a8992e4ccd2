use p256::{
    ecdsa::{
        signature::{Signer as _, Verifier as _},
        Signature, SigningKey, VerifyingKey,
    },
    EncodedPoint,
};

use crate::{Signer, SignerError};

/// ECDSA over P-256 with SHA-256; signatures are the fixed-size `r || s` form used by JOSE.
pub struct ES256Signer {}

impl ES256Signer {
    fn verifying_key(public_key: &[u8]) -> Result<VerifyingKey, SignerError> {
        let point = EncodedPoint::from_bytes(public_key).map_err(|err| {
            SignerError::CouldNotExtractPublicKey(format!(
                "couldn't initialize verifying key: {err}"
            ))
        })?;
        VerifyingKey::from_encoded_point(&point).map_err(|err| {
            SignerError::CouldNotExtractPublicKey(format!(
                "couldn't initialize verifying key: {err}"
            ))
        })
    }

    /// Compressed SEC1 form of any SEC1-encoded public key.
    pub fn compress_public_key(public_key: &[u8]) -> Result<Vec<u8>, SignerError> {
        let verifying_key = Self::verifying_key(public_key)?;
        Ok(verifying_key.to_encoded_point(true).as_bytes().to_vec())
    }
}

impl Signer for ES256Signer {
    fn sign(
        &self,
        input: &[u8],
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SignerError> {
        let signing_key = SigningKey::from_slice(private_key).map_err(|err| {
            SignerError::CouldNotExtractPublicKey(format!("couldn't initialize secret key: {err}"))
        })?;

        let expected = Self::compress_public_key(public_key)?;
        if signing_key.verifying_key().to_encoded_point(true).as_bytes() != expected.as_slice() {
            return Err(SignerError::CouldNotExtractKeyPair);
        }

        let signature: Signature = signing_key.sign(input);
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(&self, input: &[u8], signature: &[u8], public_key: &[u8]) -> Result<(), SignerError> {
        let verifying_key = Self::verifying_key(public_key)?;

        let signature = Signature::from_slice(signature).map_err(|_| SignerError::InvalidSignature)?;

        verifying_key
            .verify(input, &signature)
            .map_err(|_| SignerError::InvalidSignature)
    }
}
