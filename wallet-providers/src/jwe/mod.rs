//! Multi-recipient JWE envelope.
//!
//! The content is encrypted once with XChaCha20-Poly1305 (`XC20P`) under a random content
//! key. For each recipient the content key is wrapped with `ECDH-ES+XC20PKW`: an ephemeral
//! X25519 agreement, Concat KDF and XChaCha20-Poly1305 key wrapping. Recipient keys are the
//! X25519 `keyAgreement` methods of their DID documents.

use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use wallet_crypto::imp::{
    encryption::{
        concat_kdf_sha256, x25519_agreement, x25519_ephemeral_agreement,
        xchacha20poly1305_open, xchacha20poly1305_seal,
    },
    utilities::{generate_content_key, generate_xnonce},
};
use zeroize::Zeroizing;

use crate::{
    common_models::{did::KeyRole, PublicKeyJwk, PublicKeyJwkEllipticData},
    did::model::DidDocument,
    key_algorithm::imp::eddsa::x25519_jwk_to_bytes,
};

use error::JweError;
use model::{
    Jwe, JweProtectedHeader, JweRecipient, JweRecipientHeader, RecipientKey, CONTENT_ENCRYPTION,
    KEY_WRAPPING,
};

pub mod error;
pub mod model;

#[cfg(test)]
mod test;

const KEK_LENGTH_BITS: u32 = 256;

/// Picks the first `keyAgreement` method of `document` holding an X25519 key.
pub fn recipient_key(document: &DidDocument) -> Result<RecipientKey, JweError> {
    document
        .relationship(KeyRole::KeyAgreement)
        .iter()
        .filter_map(|id| document.find_verification_method(id))
        .find_map(|method| {
            let jwk = method.jwk().ok()?;
            x25519_jwk_to_bytes(&jwk).map(|public_key| RecipientKey {
                kid: document.absolute_id(&method.id),
                public_key,
            })
        })
        .ok_or_else(|| JweError::MissingKeyAgreementKey(document.id.to_string()))
}

pub fn encrypt(
    cleartext: &[u8],
    recipients: &[RecipientKey],
    aad: Option<&[u8]>,
) -> Result<Jwe, JweError> {
    if recipients.is_empty() {
        return Err(JweError::NoRecipients);
    }

    let protected = encode_json(&JweProtectedHeader {
        enc: CONTENT_ENCRYPTION.to_owned(),
    })?;
    let aad = aad.map(encode).transpose()?;

    let content_key = Zeroizing::new(generate_content_key());
    let iv = generate_xnonce();

    let sealed = xchacha20poly1305_seal(
        content_key.as_slice(),
        &iv,
        cleartext,
        content_aad(&protected, aad.as_deref()).as_bytes(),
    )?;

    let recipients = recipients
        .iter()
        .map(|recipient| wrap_content_key(content_key.as_slice(), recipient))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Jwe {
        protected,
        iv: encode(&iv)?,
        ciphertext: encode(&sealed.ciphertext)?,
        tag: encode(&sealed.tag)?,
        aad,
        recipients,
    })
}

/// Decrypts with an X25519 private key, trying every recipient entry.
///
/// When `expected_aad` is given it must equal the bound associated data.
pub fn decrypt(
    jwe: &Jwe,
    private_key: &[u8],
    expected_aad: Option<&[u8]>,
) -> Result<Zeroizing<Vec<u8>>, JweError> {
    if let Some(expected_aad) = expected_aad {
        let expected_aad = encode(expected_aad)?;
        if jwe.aad.as_deref() != Some(expected_aad.as_str()) {
            return Err(JweError::DecryptionFailed);
        }
    }

    let protected: JweProtectedHeader = serde_json::from_slice(&decode(&jwe.protected)?)
        .map_err(|_| JweError::DecryptionFailed)?;
    if protected.enc != CONTENT_ENCRYPTION {
        return Err(JweError::DecryptionFailed);
    }

    let iv = decode(&jwe.iv)?;
    let ciphertext = decode(&jwe.ciphertext)?;
    let tag = decode(&jwe.tag)?;
    let aad = content_aad(&jwe.protected, jwe.aad.as_deref());

    jwe.recipients
        .iter()
        .filter_map(|recipient| unwrap_content_key(recipient, private_key).ok())
        .find_map(|content_key| {
            xchacha20poly1305_open(&content_key, &iv, &ciphertext, &tag, aad.as_bytes()).ok()
        })
        .ok_or(JweError::DecryptionFailed)
}

fn wrap_content_key(
    content_key: &[u8],
    recipient: &RecipientKey,
) -> Result<JweRecipient, JweError> {
    let agreement = x25519_ephemeral_agreement(&recipient.public_key)
        .map_err(|e| JweError::InvalidRecipientKey(format!("{}: {e}", recipient.kid)))?;

    let kek = concat_kdf_sha256(
        agreement.shared_secret.as_slice(),
        KEY_WRAPPING,
        KEK_LENGTH_BITS,
    )?;
    let iv = generate_xnonce();
    let wrapped = xchacha20poly1305_seal(&kek, &iv, content_key, &[])?;

    Ok(JweRecipient {
        encrypted_key: encode(&wrapped.ciphertext)?,
        header: JweRecipientHeader {
            alg: KEY_WRAPPING.to_owned(),
            iv: encode(&iv)?,
            tag: encode(&wrapped.tag)?,
            epk: PublicKeyJwk::Okp(PublicKeyJwkEllipticData {
                r#use: None,
                crv: "X25519".to_owned(),
                x: encode(&agreement.ephemeral_public_key)?,
                y: None,
            }),
            kid: recipient.kid.to_owned(),
        },
    })
}

fn unwrap_content_key(
    recipient: &JweRecipient,
    private_key: &[u8],
) -> Result<Zeroizing<Vec<u8>>, JweError> {
    if recipient.header.alg != KEY_WRAPPING {
        return Err(JweError::DecryptionFailed);
    }

    let epk = x25519_jwk_to_bytes(&recipient.header.epk).ok_or(JweError::DecryptionFailed)?;

    let shared_secret = x25519_agreement(private_key, &epk)?;
    let kek = concat_kdf_sha256(shared_secret.as_slice(), KEY_WRAPPING, KEK_LENGTH_BITS)?;

    Ok(xchacha20poly1305_open(
        &kek,
        &decode(&recipient.header.iv)?,
        &decode(&recipient.encrypted_key)?,
        &decode(&recipient.header.tag)?,
        &[],
    )?)
}

fn content_aad(protected: &str, aad: Option<&str>) -> String {
    match aad {
        Some(aad) => format!("{protected}.{aad}"),
        None => protected.to_owned(),
    }
}

fn encode(bytes: &[u8]) -> Result<String, JweError> {
    Base64UrlSafeNoPadding::encode_to_string(bytes)
        .map_err(|e| JweError::CouldNotEncrypt(e.to_string()))
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, JweError> {
    let json = serde_json::to_vec(value).map_err(|e| JweError::CouldNotEncrypt(e.to_string()))?;
    encode(&json)
}

fn decode(value: &str) -> Result<Vec<u8>, JweError> {
    Base64UrlSafeNoPadding::decode_to_vec(value, None).map_err(|_| JweError::DecryptionFailed)
}
