//! Persistence seams for the authentication services.
//!
//! Services depend on these traits rather than on `PgPool` directly, so the
//! flows can be exercised against in-memory stores in tests. The production
//! implementations live in [`postgres`].

mod postgres;

pub use postgres::{
    PgCredentialStore, PgDeviceStore, PgRefreshTokenStore, PgRoleStore, PgVerificationCodeStore,
};

use async_trait::async_trait;
use shoply_core::{CodeId, DeviceId, RoleId, TokenId, UserId};
use shoply_db::{
    DbError, Device, OtpPurpose, RefreshToken, RoleWithPermissions, User, UserWithRoles,
    VerificationCode,
};

/// User accounts with their role assignments.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a non-deleted user by email, roles eagerly loaded.
    ///
    /// Emails are compared exactly as stored.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithRoles>, DbError>;

    /// Look up a non-deleted user by ID, roles eagerly loaded.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserWithRoles>, DbError>;

    /// Insert a new user and assign the given roles.
    async fn insert(&self, user: &User, roles: &[RoleId]) -> Result<(), DbError>;

    /// Persist changes to an existing user row.
    async fn save(&self, user: &User) -> Result<(), DbError>;
}

/// Role lookup for registration defaults.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Look up a role by its unique name, permissions eagerly loaded.
    async fn find_by_name(&self, name: &str) -> Result<Option<RoleWithPermissions>, DbError>;
}

/// One-time verification codes, at most one row per (user, purpose).
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    /// Find the code row for a (user, purpose) pair.
    async fn find_by_user_and_purpose(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
    ) -> Result<Option<VerificationCode>, DbError>;

    /// Insert or update a code row by ID.
    async fn save(&self, code: &VerificationCode) -> Result<(), DbError>;

    /// Remove a consumed code row.
    async fn delete(&self, id: CodeId) -> Result<(), DbError>;
}

/// Devices a user has signed in from.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Find a user's device row by its user-agent string.
    async fn find_by_user_and_agent(
        &self,
        user_id: UserId,
        user_agent: &str,
    ) -> Result<Option<Device>, DbError>;

    /// Find a device row by ID.
    async fn find_by_id(&self, id: DeviceId) -> Result<Option<Device>, DbError>;

    /// All devices of a user with an open session, most recently active
    /// first.
    async fn find_active_by_user(&self, user_id: UserId) -> Result<Vec<Device>, DbError>;

    /// Insert or update a device row by ID.
    async fn save(&self, device: &Device) -> Result<(), DbError>;
}

/// Stored refresh tokens, one per (user, device).
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Find a row by its exact token string.
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DbError>;

    /// Find the row bound to a device, if any.
    async fn find_by_device(&self, device_id: DeviceId) -> Result<Option<RefreshToken>, DbError>;

    /// Insert or update a row by ID.
    async fn save(&self, token: &RefreshToken) -> Result<(), DbError>;

    /// Remove a row by ID.
    async fn delete(&self, id: TokenId) -> Result<(), DbError>;

    /// Remove the row bound to a (user, device) pair, if any.
    async fn delete_by_user_and_device(
        &self,
        user_id: UserId,
        device_id: DeviceId,
    ) -> Result<(), DbError>;

    /// Remove every row belonging to a user. Used when an account is
    /// deactivated and all of its sessions must die at once.
    async fn delete_by_user(&self, user_id: UserId) -> Result<(), DbError>;
}
