//! Access guard: bearer header → verified claims → permission check.
//!
//! `authorize` is synchronous and holds no mutable state of its own; the only
//! shared data is the trusted key snapshot.
use std::sync::Arc;

use jsonwebtoken::{Algorithm, Validation};

use crate::services::auth::{
    claims::Claims,
    error::{AuthError, TokenRejection},
    keys::TrustedKeys,
};

const BEARER: &str = "Bearer";

/// Expected token issuer/audience and verification policy.
#[derive(Debug, Clone)]
pub struct GuardPolicy {
    pub issuer: String,
    pub audience: String,
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct AccessGuard {
    keys: Arc<TrustedKeys>,
    policy: GuardPolicy,
}

impl AccessGuard {
    pub fn new(keys: Arc<TrustedKeys>, policy: GuardPolicy) -> Self {
        Self { keys, policy }
    }

    pub fn keys(&self) -> &Arc<TrustedKeys> {
        &self.keys
    }

    /// Admit the request only if the header carries a verified token granting
    /// `required` exactly.
    pub fn authorize(&self, header: Option<&str>, required: &str) -> Result<Claims, AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let token = bearer_token(header)?;
        let claims = self.verify(token)?;

        if claims.permissions.is_none() {
            return Err(AuthError::InvalidClaims);
        }
        if !claims.grants(required) {
            return Err(AuthError::Forbidden(required.to_string()));
        }
        Ok(claims)
    }

    /// Signature and registered-claim verification, without the permission check.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = jsonwebtoken::decode_header(token).map_err(TokenRejection::from)?;

        let kid = header.kid.as_deref().ok_or(AuthError::InvalidKeyId)?;
        let key = self.keys.resolve(kid).ok_or(AuthError::InvalidKeyId)?;

        if !self.policy.algorithms.contains(&header.alg) {
            return Err(TokenRejection::UnsupportedAlgorithm(header.alg).into());
        }

        let data = jsonwebtoken::decode::<Claims>(token, &key, &self.validation(header.alg))
            .map_err(TokenRejection::from)?;

        Ok(data.claims)
    }

    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.set_issuer(&[&self.policy.issuer]);
        validation.set_audience(&[&self.policy.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = self.policy.leeway_seconds;
        validation.validate_nbf = true;
        validation
    }
}

/// `Bearer <token>`: exactly two parts, case-sensitive scheme, non-empty token.
fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}
