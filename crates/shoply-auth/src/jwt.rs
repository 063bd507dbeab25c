//! JWT encoding and decoding with the HS512 algorithm.
//!
//! Tokens are signed with a shared secret held by the backend; there is no
//! key distribution concern because the backend is the only verifier.

use crate::claims::Claims;
use crate::error::AuthError;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};

/// Configuration for token validation.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Clock-skew tolerance in seconds for `exp`/`iat` checks.
    pub leeway: u64,
    /// Whether to reject expired tokens.
    pub validate_exp: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            leeway: 60,
            validate_exp: true,
        }
    }
}

impl ValidationConfig {
    /// Validation config with a custom leeway.
    #[must_use]
    pub fn with_leeway(leeway: u64) -> Self {
        Self {
            leeway,
            ..Default::default()
        }
    }

    /// Disable expiration validation (use with caution).
    #[must_use]
    pub fn skip_exp_validation(mut self) -> Self {
        self.validate_exp = false;
        self
    }
}

/// Encode claims into a signed HS512 token string.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if encoding fails.
pub fn encode_token(claims: &Claims, secret: &[u8]) -> Result<String, AuthError> {
    let key = EncodingKey::from_secret(secret);
    let header = Header::new(Algorithm::HS512);

    encode(&header, claims, &key)
        .map_err(|e| AuthError::InvalidToken(format!("Encoding failed: {e}")))
}

/// Decode and validate a token with default validation settings.
///
/// # Errors
///
/// - `AuthError::TokenExpired` - the `exp` claim is in the past
/// - `AuthError::InvalidSignature` - signature verification failed
/// - `AuthError::InvalidAlgorithm` - token was signed with another algorithm
/// - `AuthError::InvalidToken` - token is malformed
pub fn decode_token(token: &str, secret: &[u8]) -> Result<Claims, AuthError> {
    decode_token_with_config(token, secret, &ValidationConfig::default())
}

/// Decode and validate a token with a custom validation config.
pub fn decode_token_with_config(
    token: &str,
    secret: &[u8],
    config: &ValidationConfig,
) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret);

    let mut validation = Validation::new(Algorithm::HS512);
    validation.leeway = config.leeway;
    validation.validate_exp = config.validate_exp;
    // Only HS512; reject anything else outright.
    validation.algorithms = vec![Algorithm::HS512];

    let token_data: TokenData<Claims> = decode(token, &key, &validation).map_err(map_jwt_error)?;

    Ok(token_data.claims)
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidAlgorithm => AuthError::InvalidAlgorithm,
        ErrorKind::InvalidToken => AuthError::InvalidToken("Malformed token".to_string()),
        ErrorKind::Base64(_) => AuthError::InvalidToken("Invalid base64 encoding".to_string()),
        ErrorKind::Json(_) => AuthError::InvalidToken("Invalid JSON in claims".to_string()),
        ErrorKind::MissingRequiredClaim(claim) => AuthError::MissingClaim(claim.to_string()),
        _ => AuthError::InvalidToken(format!("Token validation failed: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shoply_core::RoleId;

    const SECRET: &[u8] = b"unit-test-signing-secret";
    const OTHER_SECRET: &[u8] = b"a-different-signing-secret";

    #[test]
    fn encode_produces_three_part_token() {
        let claims = Claims::builder()
            .subject("a@x.com")
            .expires_in_secs(3600)
            .build();

        let token = encode_token(&claims, SECRET).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn round_trip_preserves_claims() {
        let roles = vec![RoleId::new(), RoleId::new()];
        let original = Claims::builder()
            .subject("a@x.com")
            .role_ids(roles.clone())
            .expires_in_secs(3600)
            .build();

        let token = encode_token(&original, SECRET).unwrap();
        let decoded = decode_token(&token, SECRET).unwrap();

        assert_eq!(decoded.sub, "a@x.com");
        assert_eq!(decoded.role_ids, roles);
        assert_eq!(decoded.exp, original.exp);
    }

    #[test]
    fn expired_token_rejected() {
        let claims = Claims::builder()
            .subject("a@x.com")
            .expiration(Utc::now().timestamp() - 3600)
            .build();

        let token = encode_token(&claims, SECRET).unwrap();
        let result = decode_token(&token, SECRET);

        assert!(matches!(result.unwrap_err(), AuthError::TokenExpired));
    }

    #[test]
    fn wrong_secret_rejected() {
        let claims = Claims::builder()
            .subject("a@x.com")
            .expires_in_secs(3600)
            .build();

        let token = encode_token(&claims, SECRET).unwrap();
        let result = decode_token(&token, OTHER_SECRET);

        assert!(matches!(result.unwrap_err(), AuthError::InvalidSignature));
    }

    #[test]
    fn malformed_token_rejected() {
        let result = decode_token("not.a.token", SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn leeway_tolerates_small_skew() {
        // Expired 30 seconds ago; default leeway is 60 seconds.
        let claims = Claims::builder()
            .subject("a@x.com")
            .expiration(Utc::now().timestamp() - 30)
            .build();

        let token = encode_token(&claims, SECRET).unwrap();
        assert!(decode_token(&token, SECRET).is_ok());

        // Zero leeway rejects the same token.
        let result = decode_token_with_config(&token, SECRET, &ValidationConfig::with_leeway(0));
        assert!(matches!(result.unwrap_err(), AuthError::TokenExpired));
    }

    #[test]
    fn skip_exp_validation_accepts_stale_token() {
        let claims = Claims::builder()
            .subject("a@x.com")
            .expiration(Utc::now().timestamp() - 86_400)
            .build();

        let token = encode_token(&claims, SECRET).unwrap();
        let config = ValidationConfig::default().skip_exp_validation();
        assert!(decode_token_with_config(&token, SECRET, &config).is_ok());
    }
}
