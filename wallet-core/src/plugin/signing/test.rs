use std::sync::Arc;

use serde_json::{json, Value};
use wallet_providers::did::{
    error::{DidMethodError, DidMethodProviderError},
    provider::MockDidMethodProvider,
};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use super::SigningPlugin;
use crate::{
    config::WalletConfig,
    container::Wallet,
    error::WalletError,
    model::{ProofFormat, SigningEngine, SigningOptions, VerificationOptions},
    plugin::test_utilities::{
        unsigned_credential, unsigned_presentation, wallet, wallet_with_config, CREATED,
        OTHER_SEED, SEED,
    },
    Providers,
};

fn jwt_options() -> SigningOptions {
    SigningOptions {
        proof_format: Some(ProofFormat::Jwt),
        ..Default::default()
    }
}

fn insecure_did_web_config() -> WalletConfig {
    let mut config = WalletConfig::default();
    config.did_web.resolve_to_insecure_http = true;
    config
}

#[tokio::test]
async fn test_issue_and_verify_ldp_credential() {
    let wallet = wallet(SEED).await;
    let did = wallet.invoke().get_subject_did(None).await.unwrap();

    let signed = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), None)
        .await
        .unwrap();

    assert_eq!(json!(did), signed["issuer"]);
    assert_eq!("DataIntegrityProof", signed["proof"]["type"]);
    assert_eq!("eddsa-jcs-2022", signed["proof"]["cryptosuite"]);
    assert_eq!("assertionMethod", signed["proof"]["proofPurpose"]);
    assert!(signed["proof"]["verificationMethod"]
        .as_str()
        .unwrap()
        .starts_with(&format!("{did}#")));

    let result = wallet
        .invoke()
        .verify_credential(&signed, None)
        .await
        .unwrap();

    assert_eq!(vec!["proof".to_string()], result.checks);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert!(result.is_verified());
}

#[tokio::test]
async fn test_issue_and_verify_jwt_credential() {
    let wallet = wallet(SEED).await;

    let signed = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), Some(&jwt_options()))
        .await
        .unwrap();

    let token = signed.as_str().unwrap();
    assert!(token.starts_with("eyJ"));
    assert_eq!(3, token.split('.').count());

    let result = wallet
        .invoke()
        .verify_credential(&signed, None)
        .await
        .unwrap();

    assert_eq!(vec!["JWS".to_string()], result.checks);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(result.is_verified());
}

#[tokio::test]
async fn test_other_wallet_verifies_credential() {
    let issuer = wallet(SEED).await;
    let verifier = wallet(OTHER_SEED).await;

    let signed = issuer
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), None)
        .await
        .unwrap();

    let result = verifier
        .invoke()
        .verify_credential(&signed, None)
        .await
        .unwrap();
    assert!(result.is_verified(), "{:?}", result.errors);
}

#[tokio::test]
async fn test_p256_credential() {
    let wallet = wallet(SEED).await;
    let options = SigningOptions {
        key_algorithm: Some("p256".to_string()),
        ..Default::default()
    };

    let signed = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), Some(&options))
        .await
        .unwrap();

    assert!(signed["issuer"].as_str().unwrap().starts_with("did:key:zDn"));
    assert_eq!("ecdsa-jcs-2019", signed["proof"]["cryptosuite"]);

    let result = wallet
        .invoke()
        .verify_credential(&signed, None)
        .await
        .unwrap();
    assert!(result.is_verified(), "{:?}", result.errors);

    let options = SigningOptions {
        proof_format: Some(ProofFormat::Jwt),
        ..options
    };
    let token = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), Some(&options))
        .await
        .unwrap();

    let result = wallet
        .invoke()
        .verify_credential(&token, None)
        .await
        .unwrap();
    assert!(result.is_verified(), "{:?}", result.errors);
}

#[tokio::test]
async fn test_tampered_ldp_credential() {
    let wallet = wallet(SEED).await;

    let mut signed = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), None)
        .await
        .unwrap();
    signed["credentialSubject"]["id"] = json!("did:example:5678");

    let result = wallet
        .invoke()
        .verify_credential(&signed, None)
        .await
        .unwrap();

    assert!(!result.errors.is_empty());
    assert!(!result.is_verified());
}

#[tokio::test]
async fn test_tampered_jwt_credential() {
    let wallet = wallet(SEED).await;
    let options = jwt_options();

    let first = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), Some(&options))
        .await
        .unwrap();
    let second = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:5678"), Some(&options))
        .await
        .unwrap();

    let first: Vec<&str> = first.as_str().unwrap().split('.').collect();
    let second: Vec<&str> = second.as_str().unwrap().split('.').collect();
    let forged = format!("{}.{}.{}", first[0], second[1], first[2]);

    let result = wallet
        .invoke()
        .verify_credential(&json!(forged), None)
        .await
        .unwrap();

    assert!(result.checks.is_empty());
    assert!(
        result.errors.iter().any(|e| e.starts_with("signature error")),
        "{:?}",
        result.errors
    );
}

#[tokio::test]
async fn test_issuer_of_other_did_fails() {
    let wallet = wallet(SEED).await;
    let other = wallet_with_config(OTHER_SEED, &WalletConfig::default()).await;
    let other_did = other.invoke().get_subject_did(None).await.unwrap();

    let mut signed = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), None)
        .await
        .unwrap();
    signed["issuer"] = json!(other_did);

    let result = wallet
        .invoke()
        .verify_credential(&signed, None)
        .await
        .unwrap();

    assert_eq!(1, result.errors.len());
    assert!(result.errors[0].contains("does not belong"), "{:?}", result.errors);
}

#[tokio::test]
async fn test_explicit_issuer_mismatch_is_rejected() {
    let wallet = wallet(SEED).await;

    let mut credential = unsigned_credential("did:example:1234");
    credential["issuer"] = json!({ "id": "did:example:other", "name": "Other" });

    let result = wallet.invoke().issue_credential(&credential, None).await;

    assert!(matches!(
        result,
        Err(WalletError::Validation(violations)) if violations[0].starts_with("/issuer: ")
    ));
}

#[tokio::test]
async fn test_matching_issuer_object_is_kept() {
    let wallet = wallet(SEED).await;
    let did = wallet.invoke().get_subject_did(None).await.unwrap();

    let mut credential = unsigned_credential("did:example:1234");
    credential["issuer"] = json!({ "id": did, "name": "Wallet" });

    let signed = wallet
        .invoke()
        .issue_credential(&credential, None)
        .await
        .unwrap();
    assert_eq!("Wallet", signed["issuer"]["name"]);

    let result = wallet
        .invoke()
        .verify_credential(&signed, None)
        .await
        .unwrap();
    assert!(result.is_verified(), "{:?}", result.errors);
}

#[tokio::test]
async fn test_schema_violations_are_collected() {
    let wallet = wallet(SEED).await;

    let credential = json!({
        "@context": ["https://example.com/context"],
        "type": ["ExampleCredential"]
    });

    let Err(WalletError::Validation(violations)) =
        wallet.invoke().issue_credential(&credential, None).await
    else {
        panic!("expected validation error");
    };

    assert!(violations.len() >= 3, "{violations:?}");
}

#[tokio::test]
async fn test_malformed_date_is_a_validation_error() {
    let wallet = wallet(SEED).await;
    let mut credential = unsigned_credential("did:example:1234");
    credential["expirationDate"] = json!("31/12/2030");

    for options in [None, Some(jwt_options())] {
        let Err(WalletError::Validation(violations)) = wallet
            .invoke()
            .issue_credential(&credential, options.as_ref())
            .await
        else {
            panic!("expected validation error");
        };
        assert!(
            violations.iter().any(|v| v.starts_with("/expirationDate: ")),
            "{violations:?}"
        );
    }
}

#[tokio::test]
async fn test_invalid_signing_options() {
    let wallet = wallet(SEED).await;
    let credential = unsigned_credential("did:example:1234");

    let options = SigningOptions {
        created: Some("yesterday".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        wallet.invoke().issue_credential(&credential, Some(&options)).await,
        Err(WalletError::Validation(_))
    ));

    let options = SigningOptions {
        proof_purpose: Some("dancing".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        wallet.invoke().issue_credential(&credential, Some(&options)).await,
        Err(WalletError::Validation(_))
    ));

    let options = SigningOptions {
        verification_method: Some("did:example:other#key-1".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        wallet.invoke().issue_credential(&credential, Some(&options)).await,
        Err(WalletError::Validation(_))
    ));

    let options = SigningOptions {
        key_algorithm: Some("rsa".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        wallet.invoke().issue_credential(&credential, Some(&options)).await,
        Err(WalletError::UnsupportedAlgorithm(_))
    ));
}

#[tokio::test]
async fn test_verification_without_proof() {
    let wallet = wallet(SEED).await;

    let mut credential = unsigned_credential("did:example:1234");
    credential["issuer"] = json!("did:example:issuer");

    let result = wallet
        .invoke()
        .verify_credential(&credential, None)
        .await
        .unwrap();
    assert_eq!(vec!["No proof".to_string()], result.errors);

    let result = wallet
        .invoke()
        .verify_credential(&unsigned_credential("did:example:1234"), None)
        .await
        .unwrap();
    assert_eq!(vec!["Missing issuer".to_string()], result.errors);

    assert!(matches!(
        wallet.invoke().verify_credential(&json!(42), None).await,
        Err(WalletError::Validation(_))
    ));
}

#[tokio::test]
async fn test_proof_purpose_mismatch() {
    let wallet = wallet(SEED).await;

    let signed = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), None)
        .await
        .unwrap();

    let options = VerificationOptions {
        proof_purpose: Some("authentication".to_string()),
        ..Default::default()
    };
    let result = wallet
        .invoke()
        .verify_credential(&signed, Some(&options))
        .await
        .unwrap();

    assert!(!result.is_verified());
    assert!(result.errors[0].contains("does not match"), "{:?}", result.errors);
}

#[tokio::test]
async fn test_ldp_presentation_with_challenge_and_domain() {
    let wallet = wallet(SEED).await;
    let did = wallet.invoke().get_subject_did(None).await.unwrap();

    let credential = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), None)
        .await
        .unwrap();

    let options = SigningOptions {
        challenge: Some("c0ae1c8e-c7e7-469f-b252-86e6a0e7387e".to_string()),
        domain: Some("example.com".to_string()),
        ..Default::default()
    };
    let presentation = wallet
        .invoke()
        .issue_presentation(&unsigned_presentation(vec![credential]), Some(&options))
        .await
        .unwrap();

    assert_eq!(json!(did), presentation["holder"]);
    assert_eq!("authentication", presentation["proof"]["proofPurpose"]);
    assert_eq!("example.com", presentation["proof"]["domain"]);

    let mut verification = VerificationOptions {
        challenge: options.challenge.to_owned(),
        domain: options.domain.to_owned(),
        check_credentials: true,
        ..Default::default()
    };
    let result = wallet
        .invoke()
        .verify_presentation(&presentation, Some(&verification))
        .await
        .unwrap();
    assert_eq!(vec!["proof".to_string()], result.checks);
    assert!(result.errors.is_empty(), "{:?}", result.errors);

    verification.challenge = Some("other".to_string());
    let result = wallet
        .invoke()
        .verify_presentation(&presentation, Some(&verification))
        .await
        .unwrap();
    assert_eq!(
        vec!["challenge mismatch, expected `other`".to_string()],
        result.errors
    );
}

#[tokio::test]
async fn test_jwt_presentation_with_challenge_and_domain() {
    let wallet = wallet(SEED).await;

    let options = SigningOptions {
        proof_format: Some(ProofFormat::Jwt),
        challenge: Some("123".to_string()),
        domain: Some("example.com".to_string()),
        ..Default::default()
    };
    let presentation = wallet
        .invoke()
        .issue_presentation(&unsigned_presentation(vec![]), Some(&options))
        .await
        .unwrap();
    assert!(presentation.is_string());

    let mut verification = VerificationOptions {
        challenge: Some("123".to_string()),
        domain: Some("example.com".to_string()),
        ..Default::default()
    };
    let result = wallet
        .invoke()
        .verify_presentation(&presentation, Some(&verification))
        .await
        .unwrap();
    assert_eq!(vec!["JWS".to_string()], result.checks);
    assert!(result.errors.is_empty(), "{:?}", result.errors);

    verification.domain = Some("other.com".to_string());
    let result = wallet
        .invoke()
        .verify_presentation(&presentation, Some(&verification))
        .await
        .unwrap();
    assert_eq!(1, result.errors.len());
    assert!(result.errors[0].contains("other.com"));
}

#[tokio::test]
async fn test_embedded_credential_errors_are_prefixed() {
    let wallet = wallet(SEED).await;

    let valid = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), None)
        .await
        .unwrap();
    let mut tampered = valid.clone();
    tampered["credentialSubject"]["id"] = json!("did:example:5678");

    let presentation = wallet
        .invoke()
        .issue_presentation(&unsigned_presentation(vec![valid, tampered]), None)
        .await
        .unwrap();

    let result = wallet
        .invoke()
        .verify_presentation(&presentation, None)
        .await
        .unwrap();
    assert!(result.is_verified(), "{:?}", result.errors);

    let options = VerificationOptions {
        check_credentials: true,
        ..Default::default()
    };
    let result = wallet
        .invoke()
        .verify_presentation(&presentation, Some(&options))
        .await
        .unwrap();

    assert!(!result.errors.is_empty());
    assert!(result
        .errors
        .iter()
        .all(|error| error.starts_with("credential 1: ")));
}

#[tokio::test]
async fn test_resolution_error_propagates() {
    let providers = Providers::new(&WalletConfig::default()).unwrap();

    let mut did_method_provider = MockDidMethodProvider::new();
    did_method_provider.expect_resolve().returning(|_| {
        Err(DidMethodProviderError::DidMethod(
            DidMethodError::ResolutionError("timeout".to_string()),
        ))
    });

    let plugin = SigningPlugin::new(
        providers.crypto,
        providers.key_algorithm_provider,
        Arc::new(did_method_provider),
        ProofFormat::Ldp,
    )
    .unwrap();
    let wallet = Wallet::empty().add_plugin(Arc::new(plugin)).unwrap();

    let mut credential = unsigned_credential("did:example:1234");
    credential["issuer"] = json!("did:web:example.com");
    credential["proof"] = json!({
        "type": "DataIntegrityProof",
        "cryptosuite": "eddsa-jcs-2022",
        "created": CREATED,
        "verificationMethod": "did:web:example.com#key-0",
        "proofPurpose": "assertionMethod",
        "proofValue": "z3FXQjecWufY46yg5abdVZsXqLhxhueuSoZgNSARiKBk9czhSePTFehP8c3PGfb6a22gkfUKKqUGPd1rLLRKi8WwT"
    });

    let error = wallet
        .invoke()
        .verify_credential(&credential, None)
        .await
        .unwrap_err();

    assert!(error.is_retryable());
    assert!(matches!(
        error,
        WalletError::Resolution { did, .. } if did == "did:web:example.com"
    ));
}

#[tokio::test]
async fn test_resolve_did_key() {
    let wallet = wallet(SEED).await;
    let did = wallet.invoke().get_subject_did(None).await.unwrap();

    let document = wallet
        .invoke()
        .resolve_did(did.as_str(), Some(&json!({ "accept": "application/did+json" })))
        .await
        .unwrap();

    assert_eq!(json!(did), document["id"]);
    assert!(!document["keyAgreement"].as_array().unwrap().is_empty());

    let method = wallet
        .invoke()
        .did_to_verification_method(did.as_str())
        .await
        .unwrap();
    assert!(method.starts_with(&format!("{did}#z6Mk")));

    assert!(matches!(
        wallet.invoke().resolve_did("did:ion:123", None).await,
        Err(WalletError::UnsupportedDidMethod(method)) if method == "ion"
    ));

    wallet.invoke().clear_did_cache().await.unwrap();
}

#[tokio::test]
async fn test_resolve_did_web() {
    let server = MockServer::start().await;
    let did = format!("did:web:127.0.0.1%3A{}", server.address().port());

    let wallet = wallet_with_config(SEED, &insecure_did_web_config()).await;
    let own_did = wallet.invoke().get_subject_did(None).await.unwrap();
    let own_document = wallet
        .invoke()
        .resolve_did(own_did.as_str(), None)
        .await
        .unwrap();

    let web_document: Value =
        serde_json::from_str(&own_document.to_string().replace(own_did.as_str(), &did)).unwrap();

    Mock::given(method("GET"))
        .and(path("/.well-known/did.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_document))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/alice/did.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(own_document))
        .mount(&server)
        .await;

    let document = wallet.invoke().resolve_did(&did, None).await.unwrap();
    assert_eq!(json!(did), document["id"]);

    // served from cache
    let method = wallet
        .invoke()
        .did_to_verification_method(&did)
        .await
        .unwrap();
    assert!(method.starts_with(&format!("{did}#")));

    let mismatch = wallet
        .invoke()
        .resolve_did(&format!("{did}:users:alice"), None)
        .await
        .unwrap_err();
    assert!(matches!(mismatch, WalletError::Resolution { .. }));

    let missing = wallet
        .invoke()
        .resolve_did(&format!("{did}:missing"), None)
        .await
        .unwrap_err();
    assert!(missing.is_retryable());
}

#[tokio::test]
async fn test_jwe_to_did_web_recipient() {
    let server = MockServer::start().await;
    let did = format!("did:web:127.0.0.1%3A{}", server.address().port());

    let wallet = wallet_with_config(SEED, &insecure_did_web_config()).await;
    let own_did = wallet.invoke().get_subject_did(None).await.unwrap();
    let own_document = wallet
        .invoke()
        .resolve_did(own_did.as_str(), None)
        .await
        .unwrap();
    let web_document: Value =
        serde_json::from_str(&own_document.to_string().replace(own_did.as_str(), &did)).unwrap();

    Mock::given(method("GET"))
        .and(path("/.well-known/did.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_document))
        .mount(&server)
        .await;

    let jwe = wallet
        .invoke()
        .create_jwe("hello", &[did], None)
        .await
        .unwrap();

    assert_eq!("hello", wallet.invoke().decrypt_jwe(&jwe, None).await.unwrap());
}

#[tokio::test]
async fn test_jwe_round_trip() {
    let wallet = wallet(SEED).await;
    let other = wallet_with_config(OTHER_SEED, &WalletConfig::default()).await;
    let did = wallet.invoke().get_subject_did(None).await.unwrap();

    let jwe = wallet
        .invoke()
        .create_jwe("secret", &[did.to_string()], Some("lc:credential:1"))
        .await
        .unwrap();

    assert_eq!(
        "secret",
        wallet
            .invoke()
            .decrypt_jwe(&jwe, Some("lc:credential:1"))
            .await
            .unwrap()
    );

    assert!(matches!(
        wallet.invoke().decrypt_jwe(&jwe, Some("lc:credential:2")).await,
        Err(WalletError::Decryption)
    ));
    assert!(matches!(
        other.invoke().decrypt_jwe(&jwe, Some("lc:credential:1")).await,
        Err(WalletError::Decryption)
    ));
    assert!(matches!(
        wallet.call("decryptJwe", vec![json!({ "garbage": true })]).await,
        Err(WalletError::Decryption)
    ));
}

#[tokio::test]
async fn test_jwe_to_unknown_method_fails() {
    let wallet = wallet(SEED).await;

    assert!(matches!(
        wallet
            .invoke()
            .create_jwe("secret", &["did:ion:123".to_string()], None)
            .await,
        Err(WalletError::UnsupportedDidMethod(_))
    ));
}

#[tokio::test]
async fn test_engines_produce_identical_signatures() {
    let mut native = WalletConfig::default();
    native.signing.engine = SigningEngine::Native;

    let portable = wallet(SEED).await;
    let native = wallet_with_config(SEED, &native).await;

    let options = SigningOptions {
        created: Some(CREATED.to_string()),
        ..Default::default()
    };
    let credential = unsigned_credential("did:example:1234");

    let first = portable
        .invoke()
        .issue_credential(&credential, Some(&options))
        .await
        .unwrap();
    let second = native
        .invoke()
        .issue_credential(&credential, Some(&options))
        .await
        .unwrap();

    assert_eq!(first["proof"]["proofValue"], second["proof"]["proofValue"]);
    assert_eq!(first, second);

    let result = portable
        .invoke()
        .verify_credential(&second, None)
        .await
        .unwrap();
    assert!(result.is_verified());
}

#[tokio::test]
async fn test_default_proof_format_from_config() {
    let mut config = WalletConfig::default();
    config.signing.default_proof_format = ProofFormat::Jwt;
    let wallet = wallet_with_config(SEED, &config).await;

    let signed = wallet
        .invoke()
        .issue_credential(&unsigned_credential("did:example:1234"), None)
        .await
        .unwrap();
    assert!(signed.is_string());
}
