//! Data Integrity proofs with JCS canonicalization.
//!
//! Supports `eddsa-jcs-2022` and `ecdsa-jcs-2019`. The signed bytes are
//! `SHA-256(JCS(proof config)) || SHA-256(JCS(document without proof))`, where the proof
//! config is the proof object without `proofValue`. The signature is encoded as
//! base58-btc multibase.

use std::sync::Arc;

use model::{DataIntegrityProof, ProofOptions, DATA_INTEGRITY_PROOF};
use time::format_description::well_known::Rfc3339;
use wallet_crypto::CryptoProvider;

use crate::{
    common_models::did::DidValue,
    credential_formatter::{
        error::FormatterError,
        model::{AuthenticationFn, TokenVerifier},
    },
    key_algorithm::model::KeyAlgorithmType,
};


pub mod model;

const HASH_ALGORITHM: &str = "sha-256";

pub struct DataIntegrity {
    crypto: Arc<dyn CryptoProvider>,
}

impl DataIntegrity {
    pub fn new(crypto: Arc<dyn CryptoProvider>) -> Self {
        Self { crypto }
    }

    /// Signs `document` and returns a copy with the proof attached under `proof`.
    ///
    /// An existing `proof` is replaced.
    pub async fn add_proof(
        &self,
        document: &serde_json::Value,
        options: ProofOptions,
        auth_fn: AuthenticationFn,
    ) -> Result<serde_json::Value, FormatterError> {
        let mut unsecured = document
            .as_object()
            .ok_or(FormatterError::CouldNotFormat(
                "Expected a JSON object".to_string(),
            ))?
            .to_owned();
        unsecured.remove("proof");

        let created = options
            .created
            .format(&Rfc3339)
            .map_err(|e| FormatterError::CouldNotFormat(e.to_string()))?;

        let mut proof = DataIntegrityProof {
            context: unsecured.get("@context").cloned(),
            r#type: DATA_INTEGRITY_PROOF.to_owned(),
            cryptosuite: options.algorithm.cryptosuite().to_owned(),
            created: Some(created),
            verification_method: options.verification_method,
            proof_purpose: options.proof_purpose,
            challenge: options.challenge,
            domain: options.domain,
            proof_value: None,
        };

        let proof_config = serde_json::to_value(&proof)
            .map_err(|e| FormatterError::CouldNotFormat(e.to_string()))?;
        let unsecured = serde_json::Value::Object(unsecured);

        let hash_data = self.hash_data(&proof_config, &unsecured)?;

        let signature = auth_fn
            .sign(&hash_data)
            .await
            .map_err(|e| FormatterError::CouldNotSign(e.to_string()))?;

        proof.proof_value = Some(format!("z{}", bs58::encode(signature).into_string()));

        let mut secured = unsecured;
        secured["proof"] = serde_json::to_value(&proof)
            .map_err(|e| FormatterError::CouldNotFormat(e.to_string()))?;

        Ok(secured)
    }

    /// Parses the embedded proof without verifying it.
    pub fn extract_proof(
        document: &serde_json::Value,
    ) -> Result<DataIntegrityProof, FormatterError> {
        let proof = document.get("proof").ok_or(FormatterError::MissingProof)?;

        let proof: DataIntegrityProof = serde_json::from_value(proof.clone())
            .map_err(|e| FormatterError::CouldNotVerify(format!("Invalid proof: {e}")))?;

        if proof.r#type != DATA_INTEGRITY_PROOF {
            return Err(FormatterError::CouldNotVerify(format!(
                "Unsupported proof type: {}",
                proof.r#type
            )));
        }

        Ok(proof)
    }

    /// Checks the embedded proof signature with the key named by its `verificationMethod`.
    ///
    /// Returns the verified proof so the caller can check purpose, challenge and domain.
    pub async fn verify_proof(
        &self,
        document: &serde_json::Value,
        verification: &dyn TokenVerifier,
    ) -> Result<DataIntegrityProof, FormatterError> {
        let proof = Self::extract_proof(document)?;

        let algorithm = KeyAlgorithmType::from_cryptosuite(&proof.cryptosuite)
            .ok_or(FormatterError::UnsupportedCryptosuite(proof.cryptosuite.clone()))?;

        let proof_value = proof
            .proof_value
            .as_deref()
            .ok_or(FormatterError::CouldNotVerify("Missing proof value".to_string()))?;
        let signature = decode_multibase(proof_value)?;

        let mut proof_config = document
            .get("proof")
            .cloned()
            .ok_or(FormatterError::MissingProof)?;
        if let Some(config) = proof_config.as_object_mut() {
            config.remove("proofValue");
        }

        let mut unsecured = document.to_owned();
        if let Some(unsecured) = unsecured.as_object_mut() {
            unsecured.remove("proof");
        }

        let hash_data = self.hash_data(&proof_config, &unsecured)?;

        let signer_did = DidValue::from_did_url(&proof.verification_method);

        verification
            .verify(
                Some(signer_did),
                Some(&proof.verification_method),
                algorithm.jose_alg(),
                &hash_data,
                &signature,
            )
            .await
            .map_err(|e| FormatterError::CouldNotVerify(e.to_string()))?;

        Ok(proof)
    }

    fn hash_data(
        &self,
        proof_config: &serde_json::Value,
        document: &serde_json::Value,
    ) -> Result<Vec<u8>, FormatterError> {
        let hasher = self.crypto.get_hasher(HASH_ALGORITHM)?;

        let canonical_config = serde_jcs::to_vec(proof_config)
            .map_err(|e| FormatterError::CouldNotFormat(format!("Canonicalization error: {e}")))?;
        let canonical_document = serde_jcs::to_vec(document)
            .map_err(|e| FormatterError::CouldNotFormat(format!("Canonicalization error: {e}")))?;

        let mut hash_data = hasher
            .hash(&canonical_config)
            .map_err(|e| FormatterError::Failed(format!("Hasher error: `{e}`")))?;
        hash_data.extend(
            hasher
                .hash(&canonical_document)
                .map_err(|e| FormatterError::Failed(format!("Hasher error: `{e}`")))?,
        );

        Ok(hash_data)
    }
}

fn decode_multibase(value: &str) -> Result<Vec<u8>, FormatterError> {
    let encoded = value
        .strip_prefix('z')
        .ok_or(FormatterError::CouldNotVerify(
            "Proof value is not base58-btc multibase".to_string(),
        ))?;

    bs58::decode(encoded)
        .into_vec()
        .map_err(|e| FormatterError::CouldNotVerify(format!("Invalid proof value: {e}")))
}
