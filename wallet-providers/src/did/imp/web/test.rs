use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use super::{document_url, Params, WebDidMethod};
use crate::{
    common_models::{
        did::{DidValue, KeyRole},
        PublicKeyJwk, PublicKeyJwkEllipticData,
    },
    did::{error::DidMethodError, model::DidKey, DidMethod},
    jwe::recipient_key,
};

fn url(did: &str, use_http: bool) -> String {
    document_url(&DidValue::from(did.to_string()), use_http)
        .unwrap()
        .to_string()
}

/// did:web for a path on the mock server, with the port percent-encoded.
fn did_on(server: &MockServer, path: &str) -> String {
    let host = server.uri().trim_start_matches("http://").replace(':', "%3A");
    format!("did:web:{host}{path}")
}

fn http_method() -> WebDidMethod {
    WebDidMethod::new(Params {
        use_http: true,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_document_url() {
    for (did, expected) in [
        ("did:web:example.com", "https://example.com/.well-known/did.json"),
        ("did:web:example.com:user:alice", "https://example.com/user/alice/did.json"),
        (
            "did:web:example.com%3A3000:user:alice",
            "https://example.com:3000/user/alice/did.json",
        ),
        (
            "did:web:example.com:team%20a:alice",
            "https://example.com/team%20a/alice/did.json",
        ),
    ] {
        assert_eq!(expected, url(did, false), "{did}");
    }

    assert_eq!(
        "http://localhost:8080/.well-known/did.json",
        url("did:web:localhost%3A8080", true)
    );
}

#[test]
fn test_document_url_rejects_other_methods() {
    for did in ["did:key:z6Mk", "did:web:"] {
        assert!(matches!(
            document_url(&DidValue::from(did.to_string()), false),
            Err(DidMethodError::ResolutionError(_))
        ));
    }
}

#[tokio::test]
async fn test_create_not_supported() {
    let result = WebDidMethod::new(Params::default())
        .unwrap()
        .create(&DidKey {
            key_type: "EDDSA".to_string(),
            public_key: vec![0; 32],
        })
        .await;

    assert!(matches!(result, Err(DidMethodError::NotSupported)));
}

#[tokio::test]
async fn test_resolve() {
    let server = MockServer::start().await;
    let did = did_on(&server, ":issuers:1");

    Mock::given(method("GET"))
        .and(path("/issuers/1/did.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@context": ["https://www.w3.org/ns/did/v1"],
            "id": did,
            "verificationMethod": [
                {
                    "id": format!("{did}#sign"),
                    "type": "JsonWebKey2020",
                    "controller": did,
                    "publicKeyJwk": {
                        "kty": "OKP",
                        "crv": "Ed25519",
                        "x": "0-e2i2_Ua1S5HbTYnVB0lj2Z2ytXu2-tYmDFf8f5NjU"
                    }
                },
                {
                    "id": format!("{did}#p256"),
                    "type": "JsonWebKey2020",
                    "controller": did,
                    "publicKeyJwk": {
                        "kty": "EC",
                        "crv": "P-256",
                        "x": "38M1FDts7Oea7urmseiugGW7tWc3mLpJh6rKe7xINZ8",
                        "y": "nDQW6XZ7b_u2Sy9slofYLlG03sOEoug3I0aAPQ0exs4"
                    }
                }
            ],
            "assertionMethod": ["#sign"],
            "authentication": [format!("{did}#p256")],
            "service": [{ "id": "#linked", "type": "LinkedDomains", "serviceEndpoint": "https://example.com" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let document = http_method()
        .resolve(&DidValue::from(did.clone()))
        .await
        .unwrap();

    assert_eq!(did, document.id.as_str());
    assert_eq!(
        vec![format!("{did}#sign")],
        document.relationship(KeyRole::AssertionMethod)
    );
    assert_eq!(
        PublicKeyJwk::Ec(PublicKeyJwkEllipticData {
            r#use: None,
            crv: "P-256".to_string(),
            x: "38M1FDts7Oea7urmseiugGW7tWc3mLpJh6rKe7xINZ8".to_string(),
            y: Some("nDQW6XZ7b_u2Sy9slofYLlG03sOEoug3I0aAPQ0exs4".to_string()),
        }),
        document
            .find_verification_method(&format!("{did}#p256"))
            .unwrap()
            .jwk()
            .unwrap()
    );
    assert!(document.rest.contains_key("service"));
}

#[tokio::test]
async fn test_resolve_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = http_method()
        .resolve(&DidValue::from(did_on(&server, "")))
        .await;

    assert!(matches!(result, Err(DidMethodError::ResolutionError(_))));
}

#[tokio::test]
async fn test_resolve_malformed_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/.well-known/did.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let result = http_method()
        .resolve(&DidValue::from(did_on(&server, "")))
        .await;

    assert!(matches!(result, Err(DidMethodError::ResolutionError(_))));
}

#[tokio::test]
async fn test_resolve_multibase_document() {
    let server = MockServer::start().await;
    let did = did_on(&server, ":alice");

    Mock::given(method("GET"))
        .and(path("/alice/did.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@context": [
                "https://www.w3.org/ns/did/v1",
                "https://w3id.org/security/suites/ed25519-2020/v1"
            ],
            "id": did,
            "verificationMethod": [
                {
                    "id": "#sign",
                    "type": "Ed25519VerificationKey2020",
                    "controller": did,
                    "publicKeyMultibase": "z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp"
                },
                {
                    "id": "#legacy",
                    "type": "RsaVerificationKey2018",
                    "controller": did,
                    "publicKeyPem": "-----BEGIN PUBLIC KEY-----"
                }
            ],
            "assertionMethod": ["#sign"],
            "keyAgreement": [{
                "id": format!("{did}#agree"),
                "type": "X25519KeyAgreementKey2019",
                "controller": did,
                "publicKeyBase58": "4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let document = http_method()
        .resolve(&DidValue::from(did.clone()))
        .await
        .unwrap();

    let signing = document
        .find_verification_method(&document.relationship(KeyRole::AssertionMethod)[0])
        .unwrap();
    assert_eq!(
        PublicKeyJwk::Okp(PublicKeyJwkEllipticData {
            r#use: None,
            crv: "Ed25519".to_string(),
            x: "O2onvM62pC1io6jQKm8Nc2UyFXcd4kOmOsBIoYtZ2ik".to_string(),
            y: None,
        }),
        signing.jwk().unwrap()
    );

    let recipient = recipient_key(&document).unwrap();
    assert_eq!(format!("{did}#agree"), recipient.kid);
    assert_eq!((1..=32).collect::<Vec<u8>>(), recipient.public_key);
}
