//! JWT claims for access and refresh tokens.
//!
//! Access tokens carry the subject (the user's email), issued-at and expiry
//! timestamps, and the user's role IDs under the `roleIds` claim. Refresh
//! tokens carry the subject and timestamps only; the `roleIds` claim is
//! simply absent.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shoply_core::RoleId;

/// Claims carried by a shoply token.
///
/// # Example
///
/// ```rust
/// use shoply_auth::Claims;
/// use shoply_core::RoleId;
///
/// let claims = Claims::builder()
///     .subject("alice@example.com")
///     .role_ids(vec![RoleId::new()])
///     .expires_in_secs(900)
///     .build();
///
/// assert_eq!(claims.sub, "alice@example.com");
/// assert_eq!(claims.role_ids.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the user's email address.
    pub sub: String,

    /// Issued-at as a Unix timestamp.
    pub iat: i64,

    /// Expiration as a Unix timestamp.
    pub exp: i64,

    /// Token ID. Unique per issued token, so two tokens minted for the
    /// same subject in the same second still differ.
    pub jti: String,

    /// Role IDs of the subject. Empty (and omitted on the wire) for
    /// refresh tokens; authorization expands these to permissions
    /// downstream.
    #[serde(rename = "roleIds", default, skip_serializing_if = "Vec::is_empty")]
    pub role_ids: Vec<RoleId>,
}

impl Claims {
    /// Create a builder for a new set of claims.
    #[must_use]
    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::default()
    }

    /// Whether the claims are past their expiry at the given timestamp.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Builder for [`Claims`].
#[derive(Debug, Default)]
pub struct ClaimsBuilder {
    subject: String,
    role_ids: Vec<RoleId>,
    expires_in_secs: Option<i64>,
    expiration: Option<i64>,
}

impl ClaimsBuilder {
    /// Set the subject (user email).
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.subject = sub.into();
        self
    }

    /// Set the role IDs embedded in the token.
    #[must_use]
    pub fn role_ids(mut self, role_ids: Vec<RoleId>) -> Self {
        self.role_ids = role_ids;
        self
    }

    /// Expire the token this many seconds after issuance.
    #[must_use]
    pub fn expires_in_secs(mut self, secs: i64) -> Self {
        self.expires_in_secs = Some(secs);
        self
    }

    /// Set an absolute expiration timestamp, overriding `expires_in_secs`.
    #[must_use]
    pub fn expiration(mut self, exp: i64) -> Self {
        self.expiration = Some(exp);
        self
    }

    /// Build the claims, stamping `iat` with the current time.
    #[must_use]
    pub fn build(self) -> Claims {
        let iat = Utc::now().timestamp();
        let exp = self
            .expiration
            .unwrap_or_else(|| iat + self.expires_in_secs.unwrap_or(0));

        Claims {
            sub: self.subject,
            iat,
            exp,
            jti: uuid::Uuid::new_v4().to_string(),
            role_ids: self.role_ids,
        }
    }
}
