//! Test fixtures: a trusted RS256 key set and helpers to mint tokens.
use std::sync::Arc;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use crate::services::auth::{AccessGuard, GuardPolicy, keys::TrustedKeys};

pub const ISSUER: &str = "https://coffee-shop.example.auth0.com/";
pub const AUDIENCE: &str = "drinks";
pub const KID: &str = "trusted-key-1";

pub const JWKS: &str = include_str!("testdata/jwks.json");
pub const ROTATED_JWKS: &str = include_str!("testdata/rotated_jwks.json");
pub const TRUSTED_PEM: &str = include_str!("testdata/trusted_private.pem");
pub const UNTRUSTED_PEM: &str = include_str!("testdata/untrusted_private.pem");

pub fn guard() -> AccessGuard {
    let keys = Arc::new(TrustedKeys::from_json(JWKS).unwrap());
    AccessGuard::new(
        keys,
        GuardPolicy {
            issuer: ISSUER.into(),
            audience: AUDIENCE.into(),
            algorithms: vec![Algorithm::RS256],
            leeway_seconds: 0,
        },
    )
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn payload(permissions: &[&str]) -> Value {
    json!({
        "iss": ISSUER,
        "aud": AUDIENCE,
        "sub": "auth0|barista",
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

pub fn sign_with(pem: &str, kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

pub fn sign(claims: &Value) -> String {
    sign_with(TRUSTED_PEM, Some(KID), claims)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// `Authorization` value for a valid token granting `permissions`.
pub fn bearer_with(permissions: &[&str]) -> String {
    bearer(&sign(&payload(permissions)))
}
