use super::*;

#[test]
fn test_jwk_to_bytes() {
    let jwk = PublicKeyJwk::Okp(PublicKeyJwkEllipticData {
        r#use: None,
        crv: "Ed25519".to_owned(),
        x: "m7AE5UQdjLuCOnZHB1gCFfo2uvhM6W_4xFmpJK02r7s".to_owned(),
        y: None,
    });

    assert_eq!(
        vec![
            155, 176, 4, 229, 68, 29, 140, 187, 130, 58, 118, 71, 7, 88, 2, 21, 250, 54, 186, 248,
            76, 233, 111, 248, 196, 89, 169, 36, 173, 54, 175, 187,
        ],
        Eddsa.jwk_to_bytes(&jwk).unwrap()
    )
}

#[test]
fn test_jwk_to_bytes_rejects_x25519() {
    let jwk = PublicKeyJwk::Okp(PublicKeyJwkEllipticData {
        r#use: None,
        crv: "X25519".to_owned(),
        x: "m7AE5UQdjLuCOnZHB1gCFfo2uvhM6W_4xFmpJK02r7s".to_owned(),
        y: None,
    });

    assert!(Eddsa.jwk_to_bytes(&jwk).is_err());
}

#[test]
fn test_key_pair_from_seed_is_deterministic() {
    let first = Eddsa.key_pair_from_seed(&[7u8; 32]).unwrap();
    let second = Eddsa.key_pair_from_seed(&[7u8; 32]).unwrap();
    let other = Eddsa.key_pair_from_seed(&[8u8; 32]).unwrap();

    assert_eq!(first, second);
    assert_ne!(first.public, other.public);
    assert_eq!(32, first.public.len());
    assert_eq!(64, first.private.len());
}

#[test]
fn test_key_pair_from_seed_rejects_short_seed() {
    assert!(Eddsa.key_pair_from_seed(&[7u8; 16]).is_err());
}

#[test]
fn test_multibase_prefix() {
    let key = Eddsa.key_pair_from_seed(&[1u8; 32]).unwrap();
    let multibase = Eddsa.get_multibase(&key.public).unwrap();

    assert!(multibase.starts_with("z6Mk"));

    let x25519 = ed25519_public_key_to_x25519(&key.public).unwrap();
    assert!(x25519_multibase(&x25519).starts_with("z6LS"));
}

#[test]
fn test_x25519_conversion_agrees() {
    let key = Eddsa.key_pair_from_seed(&[3u8; 32]).unwrap();

    let public = ed25519_public_key_to_x25519(&key.public).unwrap();
    let secret = ed25519_private_key_to_x25519(&key.private).unwrap();
    let secret_from_seed = ed25519_private_key_to_x25519(&[3u8; 32]).unwrap();

    assert_eq!(*secret, *secret_from_seed);

    // scalar multiplication of the Curve25519 base point yields the public key
    let mut base_point = [0u8; 32];
    base_point[0] = 9;
    let derived =
        wallet_crypto::imp::encryption::x25519_agreement(&secret, &base_point).unwrap();

    assert_eq!(public, derived.to_vec());
}

#[test]
fn test_private_key_as_jwk() {
    let key = Eddsa.key_pair_from_seed(&[5u8; 32]).unwrap();

    let jwk: serde_json::Value =
        serde_json::from_str(&Eddsa.private_key_as_jwk(key.private.clone()).unwrap()).unwrap();

    assert_eq!("OKP", jwk["kty"]);
    assert_eq!("Ed25519", jwk["crv"]);
    assert_eq!(
        Base64UrlSafeNoPadding::encode_to_string([5u8; 32]).unwrap(),
        jwk["d"]
    );
    assert_eq!(
        Base64UrlSafeNoPadding::encode_to_string(&key.public).unwrap(),
        jwk["x"]
    );
}

#[test]
fn test_x25519_jwk_round_trip() {
    let jwk = x25519_jwk(&[4u8; 32]).unwrap();

    assert_eq!(Some(vec![4u8; 32]), x25519_jwk_to_bytes(&jwk));
    assert_eq!(
        None,
        x25519_jwk_to_bytes(&Eddsa.bytes_to_jwk(&[4u8; 32], None).unwrap())
    );
}
