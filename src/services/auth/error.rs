//! Authorization failures produced by the access guard.
//!
//! Every variant maps to exactly one HTTP status; the HTTP layer only renders
//! what it gets here.
use axum::http::StatusCode;
use jsonwebtoken::{Algorithm, errors::ErrorKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingHeader,
    #[error("authorization header must be 'Bearer <token>'")]
    MalformedHeader,
    #[error("token is not signed by a trusted key")]
    InvalidKeyId,
    #[error("invalid token: {0}")]
    InvalidToken(TokenRejection),
    #[error("permissions not included in token")]
    InvalidClaims,
    #[error("permission '{0}' not granted")]
    Forbidden(String),
}

impl AuthError {
    /// Stable code for logs and clients.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::InvalidKeyId => "invalid_key_id",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::Forbidden(_) => "forbidden",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Why a token failed signature or claim verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("signature verification failed")]
    BadSignature,
    #[error("incorrect issuer")]
    WrongIssuer,
    #[error("incorrect audience")]
    WrongAudience,
    #[error("missing required claim '{0}'")]
    MissingClaim(String),
    #[error("unsupported algorithm {0:?}")]
    UnsupportedAlgorithm(Algorithm),
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenRejection {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::InvalidIssuer => Self::WrongIssuer,
            ErrorKind::InvalidAudience => Self::WrongAudience,
            ErrorKind::MissingRequiredClaim(claim) => Self::MissingClaim(claim.clone()),
            _ => Self::Malformed(e.to_string()),
        }
    }
}

impl From<TokenRejection> for AuthError {
    fn from(reason: TokenRejection) -> Self {
        AuthError::InvalidToken(reason)
    }
}
