use std::{collections::HashMap, sync::Arc};

use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use maplit::hashmap;
use serde_json::json;
use wallet_crypto::MockCryptoProvider;
use zeroize::Zeroizing;

use super::{decrypt, encrypt, error::JweError, model::RecipientKey, recipient_key};
use crate::{
    common_models::{did::DidValue, PublicKeyJwk, PublicKeyJwkEllipticData},
    did::{
        imp::key::KeyDidMethod,
        model::{DidDocument, DidKey, DidVerificationMethod},
        DidMethod,
    },
    key_algorithm::{
        imp::{
            eddsa::{ed25519_private_key_to_x25519, ed25519_public_key_to_x25519, Eddsa},
            provider::KeyAlgorithmProviderImpl,
        },
        KeyAlgorithm,
    },
};

struct TestParty {
    recipient: RecipientKey,
    private_key: Zeroizing<Vec<u8>>,
}

fn party(seed: u8) -> TestParty {
    let key = Eddsa.key_pair_from_seed(&[seed; 32]).unwrap();

    TestParty {
        recipient: RecipientKey {
            kid: format!("did:example:{seed}#key-x25519"),
            public_key: ed25519_public_key_to_x25519(&key.public).unwrap(),
        },
        private_key: ed25519_private_key_to_x25519(&key.private).unwrap(),
    }
}

#[test]
fn test_two_recipients_can_both_decrypt() {
    let alice = party(1);
    let bob = party(2);
    let cleartext = serde_json::to_vec(&json!({ "msg": "secret" })).unwrap();

    let jwe = encrypt(
        &cleartext,
        &[alice.recipient.clone(), bob.recipient.clone()],
        None,
    )
    .unwrap();

    assert_eq!(2, jwe.recipients.len());
    assert_eq!(
        cleartext,
        *decrypt(&jwe, &alice.private_key, None).unwrap()
    );
    assert_eq!(cleartext, *decrypt(&jwe, &bob.private_key, None).unwrap());
}

#[test]
fn test_non_recipient_cannot_decrypt() {
    let alice = party(1);
    let mallory = party(3);

    let jwe = encrypt(b"secret", &[alice.recipient], None).unwrap();

    assert_eq!(
        Err(JweError::DecryptionFailed),
        decrypt(&jwe, &mallory.private_key, None).map(|_| ())
    );
}

#[test]
fn test_wire_format() {
    let alice = party(1);

    let jwe = encrypt(b"secret", &[alice.recipient.clone()], Some(b"lc:credential:1")).unwrap();

    let protected = Base64UrlSafeNoPadding::decode_to_vec(&jwe.protected, None).unwrap();
    assert_eq!(
        json!({ "enc": "XC20P" }),
        serde_json::from_slice::<serde_json::Value>(&protected).unwrap()
    );
    assert_eq!(
        Some(Base64UrlSafeNoPadding::encode_to_string(b"lc:credential:1").unwrap()),
        jwe.aad
    );

    let value = serde_json::to_value(&jwe).unwrap();
    let header = &value["recipients"][0]["header"];
    assert_eq!("ECDH-ES+XC20PKW", header["alg"]);
    assert_eq!(alice.recipient.kid, header["kid"]);
    assert_eq!("OKP", header["epk"]["kty"]);
    assert_eq!("X25519", header["epk"]["crv"]);
    assert_eq!(
        24,
        Base64UrlSafeNoPadding::decode_to_vec(&jwe.iv, None).unwrap().len()
    );
}

#[test]
fn test_aad_binding() {
    let alice = party(1);
    let jwe = encrypt(b"secret", &[alice.recipient], Some(b"lc:credential:1")).unwrap();

    assert!(decrypt(&jwe, &alice.private_key, Some(b"lc:credential:1")).is_ok());
    assert!(decrypt(&jwe, &alice.private_key, None).is_ok());
    assert_eq!(
        Err(JweError::DecryptionFailed),
        decrypt(&jwe, &alice.private_key, Some(b"lc:credential:2")).map(|_| ())
    );

    let mut tampered = jwe.clone();
    tampered.aad = Some(Base64UrlSafeNoPadding::encode_to_string(b"lc:credential:2").unwrap());
    assert_eq!(
        Err(JweError::DecryptionFailed),
        decrypt(&tampered, &alice.private_key, None).map(|_| ())
    );
}

#[test]
fn test_tampered_ciphertext_and_tag() {
    let alice = party(1);
    let jwe = encrypt(b"secret message", &[alice.recipient], None).unwrap();

    let mut tampered = jwe.clone();
    let mut ciphertext = Base64UrlSafeNoPadding::decode_to_vec(&jwe.ciphertext, None).unwrap();
    ciphertext[0] ^= 1;
    tampered.ciphertext = Base64UrlSafeNoPadding::encode_to_string(ciphertext).unwrap();
    assert!(decrypt(&tampered, &alice.private_key, None).is_err());

    let mut tampered = jwe.clone();
    tampered.tag = jwe.recipients[0].header.tag.clone();
    assert!(decrypt(&tampered, &alice.private_key, None).is_err());

    let mut tampered = jwe;
    tampered.protected = Base64UrlSafeNoPadding::encode_to_string(br#"{"enc":"A256GCM"}"#).unwrap();
    assert!(decrypt(&tampered, &alice.private_key, None).is_err());
}

#[test]
fn test_no_recipients() {
    assert_eq!(Err(JweError::NoRecipients), encrypt(b"secret", &[], None));
}

fn key_did_method() -> KeyDidMethod {
    let algorithms: HashMap<String, Arc<dyn KeyAlgorithm>> =
        hashmap! { "EDDSA".to_string() => Arc::new(Eddsa) as Arc<dyn KeyAlgorithm> };

    KeyDidMethod::new(Arc::new(KeyAlgorithmProviderImpl::new(
        algorithms,
        Arc::new(MockCryptoProvider::new()),
    )))
}

#[tokio::test]
async fn test_recipient_key_from_did_key_document() {
    let key = Eddsa.key_pair_from_seed(&[9; 32]).unwrap();
    let method = key_did_method();
    let did = method
        .create(&DidKey {
            key_type: "EDDSA".to_string(),
            public_key: key.public.clone(),
        })
        .await
        .unwrap();
    let document = method.resolve(&did).await.unwrap();

    let recipient = recipient_key(&document).unwrap();

    assert!(recipient.kid.starts_with(&format!("{did}#z6LS")));
    assert_eq!(
        ed25519_public_key_to_x25519(&key.public).unwrap(),
        recipient.public_key
    );

    let jwe = encrypt(b"secret", &[recipient], None).unwrap();
    let private_key = ed25519_private_key_to_x25519(&key.private).unwrap();
    assert_eq!(b"secret".to_vec(), *decrypt(&jwe, &private_key, None).unwrap());
}

#[test]
fn test_recipient_key_requires_x25519() {
    let did = "did:key:zDnaerx9CtbPJ1q36T5Ln5wYt3MQYeGRG5ehnPAmxcf5mDZpv";
    let method_id = format!("{did}#key-0");
    let document = DidDocument {
        context: json!(["https://www.w3.org/ns/did/v1"]),
        id: DidValue::from(did.to_string()),
        verification_method: vec![DidVerificationMethod::from_jwk(
            method_id.clone(),
            "JsonWebKey2020",
            did.to_string(),
            PublicKeyJwk::Ec(PublicKeyJwkEllipticData {
                r#use: None,
                crv: "P-256".to_string(),
                x: "igrFmi0whuihKnj9R3Om1SoMph72wUGeFaBbzG2vzns".to_string(),
                y: Some("efsX5b10x8yjyrj4ny3pGfLcY7Xby1KzgqOdqnsrJIM".to_string()),
            }),
        )],
        authentication: None,
        assertion_method: None,
        key_agreement: Some(vec![method_id.into()]),
        capability_invocation: None,
        capability_delegation: None,
        rest: Default::default(),
    };

    assert!(matches!(
        recipient_key(&document),
        Err(JweError::MissingKeyAgreementKey(_))
    ));
}
