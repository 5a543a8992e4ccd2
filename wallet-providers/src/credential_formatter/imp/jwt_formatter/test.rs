use serde_json::json;
use time::macros::datetime;

use super::{
    extract_credential, extract_presentation, format_credential, format_presentation, is_jwt,
    model::PresentationJwtOptions, VC,
};
use crate::credential_formatter::{
    error::FormatterError,
    imp::{jwt::Jwt, test_utilities::MockAuth},
    model::MockTokenVerifier,
};

fn test_credential() -> serde_json::Value {
    json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "id": "http://example.org/credentials/3731",
        "type": ["VerifiableCredential"],
        "issuer": { "id": "did:key:z6MkIssuer", "name": "Issuer" },
        "issuanceDate": "2020-08-19T21:41:50Z",
        "expirationDate": "2030-08-19T21:41:50Z",
        "credentialSubject": { "id": "did:example:d23dd687a7dc6787646f2eb98d0" },
        "proof": { "type": "Ed25519Signature2020" }
    })
}

#[tokio::test]
async fn test_format_credential_claims() {
    let token = format_credential(
        &test_credential(),
        "EdDSA",
        Box::new(MockAuth(|_: &[u8]| vec![1, 2, 3])),
    )
    .await
    .unwrap();

    assert!(is_jwt(&token));

    let decomposed = Jwt::<VC>::split(&token).unwrap();
    assert_eq!("EdDSA", decomposed.header.algorithm);
    assert_eq!(Some("JWT".to_string()), decomposed.header.token_type);
    assert_eq!(Some("#key0".to_string()), decomposed.header.key_id);

    let payload = decomposed.payload;
    assert_eq!(Some("did:key:z6MkIssuer".to_string()), payload.issuer);
    assert_eq!(
        Some("did:example:d23dd687a7dc6787646f2eb98d0".to_string()),
        payload.subject
    );
    assert_eq!(
        Some("http://example.org/credentials/3731".to_string()),
        payload.token_id
    );
    assert_eq!(Some(datetime!(2020-08-19 21:41:50 UTC)), payload.not_before);
    assert_eq!(Some(datetime!(2030-08-19 21:41:50 UTC)), payload.expires_at);
    assert!(!payload.custom.vc.contains_key("proof"));
    assert_eq!(
        test_credential()["credentialSubject"],
        payload.custom.vc["credentialSubject"]
    );
    assert_eq!(vec![1, 2, 3], decomposed.signature);
}

#[tokio::test]
async fn test_format_credential_missing_issuer() {
    let mut credential = test_credential();
    credential.as_object_mut().unwrap().remove("issuer");

    let result = format_credential(
        &credential,
        "EdDSA",
        Box::new(MockAuth(|_: &[u8]| vec![1])),
    )
    .await;

    assert!(matches!(result, Err(FormatterError::MissingIssuer)));
}

#[tokio::test]
async fn test_format_credential_invalid_date() {
    let mut credential = test_credential();
    credential["expirationDate"] = json!("next tuesday");

    let result = format_credential(
        &credential,
        "EdDSA",
        Box::new(MockAuth(|_: &[u8]| vec![1])),
    )
    .await;

    assert!(matches!(result, Err(FormatterError::CouldNotFormat(_))));
}

#[tokio::test]
async fn test_format_presentation_binds_challenge_and_domain() {
    let presentation = json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "type": ["VerifiablePresentation"],
        "holder": "did:key:z6MkHolder",
    });

    let token = format_presentation(
        &presentation,
        "EdDSA",
        PresentationJwtOptions {
            challenge: Some("challenge-1".to_string()),
            domain: Some("example.com".to_string()),
        },
        Box::new(MockAuth(|_: &[u8]| vec![7])),
    )
    .await
    .unwrap();

    let jwt = extract_presentation(&token, None).await.unwrap();
    assert_eq!(Some("did:key:z6MkHolder".to_string()), jwt.payload.issuer);
    assert_eq!(Some("challenge-1".to_string()), jwt.payload.nonce);
    assert_eq!(Some(vec!["example.com".to_string()]), jwt.payload.audience);
    assert_eq!(presentation["type"], jwt.payload.custom.vp["type"]);
}

#[tokio::test]
async fn test_extract_credential_verifies_against_issuer() {
    let token = format_credential(
        &test_credential(),
        "EdDSA",
        Box::new(MockAuth(|_: &[u8]| vec![4, 5, 6])),
    )
    .await
    .unwrap();

    let mut verifier = MockTokenVerifier::default();
    verifier
        .expect_verify()
        .withf(|issuer_did_value, key_id, algorithm, _, signature| {
            assert_eq!(
                "did:key:z6MkIssuer",
                issuer_did_value.as_ref().unwrap().as_str()
            );
            assert_eq!(Some("#key0"), key_id.as_deref());
            assert_eq!("EdDSA", algorithm);
            assert_eq!(vec![4u8, 5, 6], signature);
            true
        })
        .once()
        .returning(|_, _, _, _, _| Ok(()));

    let jwt = extract_credential(&token, Some(&verifier))
        .await
        .unwrap();

    assert_eq!(
        Some(&json!("http://example.org/credentials/3731")),
        jwt.payload.custom.vc.get("id")
    );
}

#[tokio::test]
async fn test_extract_presentation_malformed() {
    let result = extract_presentation("eyJhbGciOiJFZERTQSJ9.bm9wZQ.AQ", None).await;

    assert!(matches!(
        result,
        Err(FormatterError::CouldNotExtractPresentation(_))
    ));
}

#[test]
fn test_is_jwt() {
    assert!(is_jwt("eyJhbGciOiJFZERTQSJ9.eyJpc3MiOiJhIn0.AQ"));
    assert!(!is_jwt("eyJhbGciOiJFZERTQSJ9"));
    assert!(!is_jwt("{\"proof\":{}}"));
}
