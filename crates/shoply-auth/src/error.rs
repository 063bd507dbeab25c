//! Error type for token and hashing operations.

use thiserror::Error;

/// Errors raised by the JWT and hashing primitives.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Argon2 hashing failed.
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    /// A stored hash is not a valid PHC string.
    #[error("Invalid hash format")]
    InvalidHashFormat,

    /// The token's `exp` claim is in the past.
    #[error("Token has expired")]
    TokenExpired,

    /// Signature verification failed.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The token is malformed or failed validation.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The token was signed with an unexpected algorithm.
    #[error("Invalid token algorithm")]
    InvalidAlgorithm,

    /// A required claim is missing.
    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}
