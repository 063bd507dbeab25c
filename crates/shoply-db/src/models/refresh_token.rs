//! Refresh token entity model.

use chrono::{DateTime, Duration, Utc};
use shoply_core::{DeviceId, TokenId, UserId};
use sqlx::FromRow;

/// A stored refresh token, one per (user, device).
///
/// The row holds the signed token string verbatim; presentation of a token
/// that matches no row is a hard failure. The row's `expires_at` is separate
/// from the JWT's own `exp` claim and both must hold for a refresh to
/// succeed.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    /// Unique identifier.
    pub id: uuid::Uuid,

    /// Owning user.
    pub user_id: uuid::Uuid,

    /// Device this token is bound to.
    pub device_id: uuid::Uuid,

    /// The signed refresh JWT, stored verbatim.
    pub token: String,

    /// Row-level expiry, independent of the JWT `exp` claim.
    pub expires_at: DateTime<Utc>,

    /// When the row was created or last rotated.
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Create a new token row bound to a (user, device) pair.
    #[must_use]
    pub fn issue(user_id: UserId, device_id: DeviceId, token: &str, valid_for: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: TokenId::new().as_uuid(),
            user_id: user_id.as_uuid(),
            device_id: device_id.as_uuid(),
            token: token.to_string(),
            expires_at: now + valid_for,
            created_at: now,
        }
    }

    /// Rotate the row in place: new token string, fresh expiry window.
    ///
    /// The row identity and device binding are preserved.
    pub fn rotate(&mut self, token: &str, valid_for: Duration) {
        let now = Utc::now();
        self.token = token.to_string();
        self.expires_at = now + valid_for;
        self.created_at = now;
    }

    /// Whether the row-level expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// The token ID as a typed `TokenId`.
    #[must_use]
    pub fn token_id(&self) -> TokenId {
        TokenId::from_uuid(self.id)
    }

    /// The owning user's ID as a typed `UserId`.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.user_id)
    }

    /// The bound device's ID as a typed `DeviceId`.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        DeviceId::from_uuid(self.device_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_binds_user_and_device() {
        let user_id = UserId::new();
        let device_id = DeviceId::new();
        let row = RefreshToken::issue(user_id, device_id, "signed.jwt", Duration::days(30));

        assert_eq!(row.user_id, user_id.as_uuid());
        assert_eq!(row.device_id, device_id.as_uuid());
        assert_eq!(row.token, "signed.jwt");
        assert!(!row.is_expired());
    }

    #[test]
    fn rotate_keeps_identity_and_resets_expiry() {
        let mut row = RefreshToken::issue(
            UserId::new(),
            DeviceId::new(),
            "old.jwt",
            Duration::days(30),
        );
        row.expires_at = Utc::now() - Duration::seconds(1);
        let id = row.id;
        let device_id = row.device_id;

        row.rotate("new.jwt", Duration::days(30));

        assert_eq!(row.id, id);
        assert_eq!(row.device_id, device_id);
        assert_eq!(row.token, "new.jwt");
        assert!(!row.is_expired());
    }
}
