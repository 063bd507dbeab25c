//! Token issuance.
//!
//! Stateless signing of access and refresh JWTs. Stored refresh-token rows
//! carry their own expiry window, managed by the auth service; this module
//! only mints the signed strings.

use chrono::Duration;
use shoply_auth::{encode_token, Claims};
use shoply_core::RoleId;

use crate::error::ApiAuthError;

/// Default access token validity in minutes.
pub const ACCESS_TOKEN_VALIDITY_MINUTES: i64 = 15;

/// Default refresh JWT validity in days.
pub const REFRESH_TOKEN_VALIDITY_DAYS: i64 = 14;

/// Stored refresh-token row validity in days, independent of the JWT's
/// own `exp` claim.
pub const REFRESH_ROW_VALIDITY_DAYS: i64 = 30;

/// Configuration for JWT signing.
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC-SHA512 signing secret.
    pub secret: Vec<u8>,
    /// Access token validity in minutes.
    pub access_token_minutes: i64,
    /// Refresh JWT validity in days.
    pub refresh_token_days: i64,
}

impl TokenConfig {
    /// Build a config with the default validity periods.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            access_token_minutes: ACCESS_TOKEN_VALIDITY_MINUTES,
            refresh_token_days: REFRESH_TOKEN_VALIDITY_DAYS,
        }
    }
}

/// Service minting signed access and refresh tokens.
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
}

impl TokenService {
    /// Create a new token service.
    #[must_use]
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Mint an access token for a user.
    ///
    /// The subject is the user's email; authorities travel as role IDs in
    /// the `roleIds` claim, re-expanded to permissions downstream.
    pub fn issue_access_token(
        &self,
        email: &str,
        role_ids: Vec<RoleId>,
    ) -> Result<String, ApiAuthError> {
        let claims = Claims::builder()
            .subject(email)
            .role_ids(role_ids)
            .expires_in_secs(Duration::minutes(self.config.access_token_minutes).num_seconds())
            .build();

        self.sign(&claims)
    }

    /// Mint a refresh token for a user. Carries no role claims; authorities
    /// are re-derived from current roles at exchange time.
    pub fn issue_refresh_token(&self, email: &str) -> Result<String, ApiAuthError> {
        let claims = Claims::builder()
            .subject(email)
            .expires_in_secs(Duration::days(self.config.refresh_token_days).num_seconds())
            .build();

        self.sign(&claims)
    }

    /// Validity window for stored refresh-token rows.
    #[must_use]
    pub fn refresh_row_validity(&self) -> Duration {
        Duration::days(REFRESH_ROW_VALIDITY_DAYS)
    }

    fn sign(&self, claims: &Claims) -> Result<String, ApiAuthError> {
        encode_token(claims, &self.config.secret).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiAuthError::internal(format!("Token generation error: {e}"))
        })
    }
}
