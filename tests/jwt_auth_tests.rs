// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Admin JWT tests.
//!
//! These verify that tokens minted by `create_admin_jwt` decode with the
//! claims the admin middleware expects, catching compatibility drift early.

use haullink::middleware::admin::AdminClaims;
use haullink::middleware::create_admin_jwt;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

#[test]
fn test_admin_jwt_roundtrip() {
    let token = create_admin_jwt("admin-42", SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<AdminClaims>(&token, &key, &validation)
        .expect("Failed to decode admin JWT - check AdminClaims compatibility");

    assert_eq!(token_data.claims.sub, "admin-42");
    assert!(token_data.claims.admin);
    assert!(token_data.claims.exp > token_data.claims.iat);
}

#[test]
fn test_admin_jwt_expiry_is_eight_hours() {
    use std::time::{SystemTime, UNIX_EPOCH};

    let token = create_admin_jwt("admin-1", SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false; // checked manually

    let token_data = decode::<AdminClaims>(&token, &key, &validation).unwrap();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    // Expires roughly 8 hours out.
    assert!(token_data.claims.exp > now + 7 * 60 * 60);
    assert!(token_data.claims.exp <= now + 8 * 60 * 60 + 60);
}

#[test]
fn test_admin_jwt_rejects_wrong_key() {
    let token = create_admin_jwt("admin-1", SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(b"a_completely_different_key_here!");
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<AdminClaims>(&token, &key, &validation).is_err());
}
