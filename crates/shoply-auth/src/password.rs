//! Argon2id hashing for passwords and OTP codes.
//!
//! The same primitive covers both stored credentials and one-time codes:
//! an OTP is hashed before persistence exactly like a password, so a leaked
//! verification-code table does not reveal live codes.

use crate::error::AuthError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Argon2id hasher.
///
/// Defaults follow the OWASP-recommended parameters (19 MiB memory,
/// 2 iterations, parallelism 1).
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        // m=19456 KiB, t=2, p=1. These constants are always valid, so the
        // expect only fires on an argon2 library bug.
        let params = Params::new(19456, 2, 1, None).expect("default Argon2 parameters are valid");
        Self { params }
    }
}

impl PasswordHasher {
    /// Create a hasher with custom parameters.
    ///
    /// Mainly useful for tests, where the default memory cost is
    /// unnecessarily slow.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::HashingFailed` if the parameters are invalid.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::HashingFailed(format!("Invalid parameters: {e}")))?;
        Ok(Self { params })
    }

    /// Hash a secret, producing a PHC-formatted string with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::HashingFailed` if hashing fails.
    pub fn hash(&self, secret: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let hash = argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify a secret against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on a mismatch; only a malformed stored hash is
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidHashFormat` if `hash` is not a valid PHC
    /// string.
    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidHashFormat)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        match argon2.verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}
