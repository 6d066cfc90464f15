//! Custom error types specific to authentication failures.
//!
//! This module defines the failures the session lifecycle can produce,
//! including the tagged token-verification faults. Callers treat every token
//! fault as "unauthenticated", but logs and tests can tell signature, expiry
//! and malformed-payload rejections apart.

use std::fmt;

use thiserror::Error;

/// Why a presented token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFault {
    /// Signature did not verify under the configured key.
    Signature,
    /// Signature verified but the token is past its expiry.
    Expired,
    /// The token could not be decoded into the expected claims at all.
    Malformed,
}

impl fmt::Display for TokenFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenFault::Signature => write!(f, "invalid token signature"),
            TokenFault::Expired => write!(f, "token expired"),
            TokenFault::Malformed => write!(f, "malformed token"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// No identity matches the submitted username/email.
    #[error("user does not exist")]
    UnknownIdentity,

    /// Identity exists but the supplied password is wrong.
    #[error("incorrect password")]
    BadCredentials,

    /// No refresh token was presented at all.
    #[error("unauthorized request")]
    MissingToken,

    /// The presented token failed cryptographic verification.
    #[error("invalid refresh token: {0}")]
    TokenRejected(TokenFault),

    /// The token verified but does not match the stored slot: it was already
    /// rotated away, or was never issued by us for this identity.
    #[error("refresh token is stale or already used")]
    StaleToken,

    /// The token's identity no longer exists.
    #[error("invalid refresh token")]
    OrphanToken,

    /// Username or email is already taken.
    #[error("user with email or username already exists")]
    DuplicateIdentity,

    /// Signing a token failed.
    #[error("failed to mint session tokens")]
    TokenGeneration,

    /// Password hashing failed.
    #[error("failed to hash password")]
    Hashing,

    /// The identity store failed; message is internal diagnostic only.
    #[error("identity store failure: {0}")]
    Store(String),
}

impl AuthError {
    pub fn store(err: impl fmt::Display) -> Self {
        AuthError::Store(err.to_string())
    }
}

/// Classify a `jsonwebtoken` failure into the tagged fault callers log and
/// tests assert on. Anything that is neither a signature nor an expiry
/// problem counts as malformed.
pub fn classify_jwt_error(err: &jsonwebtoken::errors::Error) -> TokenFault {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => TokenFault::Expired,
        ErrorKind::InvalidSignature
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName => TokenFault::Signature,
        _ => TokenFault::Malformed,
    }
}
