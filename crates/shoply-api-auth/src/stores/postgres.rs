//! Postgres implementations of the persistence seams.

use async_trait::async_trait;
use sqlx::PgPool;

use shoply_core::{CodeId, DeviceId, RoleId, TokenId, UserId};
use shoply_db::{
    DbError, Device, OtpPurpose, Permission, RefreshToken, Role, RoleWithPermissions, User,
    UserWithRoles, VerificationCode,
};

use super::{CredentialStore, DeviceStore, RefreshTokenStore, RoleStore, VerificationCodeStore};

/// User accounts backed by the `users`, `roles` and `user_roles` tables.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Create a store over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_roles(&self, user_id: uuid::Uuid) -> Result<Vec<Role>, DbError> {
        let roles = sqlx::query_as::<_, Role>(
            r"
            SELECT r.*
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1 AND r.is_deleted = FALSE
            ORDER BY r.name
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithRoles>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r"SELECT * FROM users WHERE email = $1 AND is_deleted = FALSE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) => {
                let roles = self.load_roles(user.id).await?;
                Ok(Some(UserWithRoles { user, roles }))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserWithRoles>, DbError> {
        let user =
            sqlx::query_as::<_, User>(r"SELECT * FROM users WHERE id = $1 AND is_deleted = FALSE")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        match user {
            Some(user) => {
                let roles = self.load_roles(user.id).await?;
                Ok(Some(UserWithRoles { user, roles }))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, user: &User, roles: &[RoleId]) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO users (
                id, full_name, email, password_hash,
                phone_number, address, avatar, date_of_birth,
                is_active, is_deleted, is_verified,
                created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ",
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone_number)
        .bind(&user.address)
        .bind(&user.avatar)
        .bind(user.date_of_birth)
        .bind(user.is_active)
        .bind(user.is_deleted)
        .bind(user.is_verified)
        .bind(user.created_at)
        .bind(&user.created_by)
        .bind(user.updated_at)
        .bind(&user.updated_by)
        .execute(&self.pool)
        .await?;

        for role_id in roles {
            sqlx::query(
                r"
                INSERT INTO user_roles (user_id, role_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(user.id)
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), DbError> {
        sqlx::query(
            r"
            UPDATE users
            SET full_name = $2, password_hash = $3,
                phone_number = $4, address = $5, avatar = $6, date_of_birth = $7,
                is_active = $8, is_deleted = $9, is_verified = $10,
                updated_at = $11, updated_by = $12
            WHERE id = $1
            ",
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(&user.phone_number)
        .bind(&user.address)
        .bind(&user.avatar)
        .bind(user.date_of_birth)
        .bind(user.is_active)
        .bind(user.is_deleted)
        .bind(user.is_verified)
        .bind(user.updated_at)
        .bind(&user.updated_by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Roles backed by the `roles`, `permissions` and `role_permissions` tables.
#[derive(Clone)]
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    /// Create a store over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<RoleWithPermissions>, DbError> {
        let role = sqlx::query_as::<_, Role>(
            r"SELECT * FROM roles WHERE name = $1 AND is_deleted = FALSE",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        let Some(role) = role else {
            return Ok(None);
        };

        let permissions = sqlx::query_as::<_, Permission>(
            r"
            SELECT p.*
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.module, p.name
            ",
        )
        .bind(role.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(RoleWithPermissions { role, permissions }))
    }
}

/// Verification codes backed by the `verification_codes` table.
#[derive(Clone)]
pub struct PgVerificationCodeStore {
    pool: PgPool,
}

impl PgVerificationCodeStore {
    /// Create a store over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationCodeStore for PgVerificationCodeStore {
    async fn find_by_user_and_purpose(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
    ) -> Result<Option<VerificationCode>, DbError> {
        let code = sqlx::query_as::<_, VerificationCode>(
            r"SELECT * FROM verification_codes WHERE user_id = $1 AND purpose = $2",
        )
        .bind(user_id.as_uuid())
        .bind(purpose)
        .fetch_optional(&self.pool)
        .await?;

        Ok(code)
    }

    async fn save(&self, code: &VerificationCode) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO verification_codes (
                id, user_id, hashed_code, expires_at, attempts, purpose, is_verified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET hashed_code = EXCLUDED.hashed_code,
                expires_at = EXCLUDED.expires_at,
                attempts = EXCLUDED.attempts,
                is_verified = EXCLUDED.is_verified
            ",
        )
        .bind(code.id)
        .bind(code.user_id)
        .bind(&code.hashed_code)
        .bind(code.expires_at)
        .bind(code.attempts)
        .bind(code.purpose)
        .bind(code.is_verified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: CodeId) -> Result<(), DbError> {
        sqlx::query(r"DELETE FROM verification_codes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Devices backed by the `devices` table.
#[derive(Clone)]
pub struct PgDeviceStore {
    pool: PgPool,
}

impl PgDeviceStore {
    /// Create a store over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceStore for PgDeviceStore {
    async fn find_by_user_and_agent(
        &self,
        user_id: UserId,
        user_agent: &str,
    ) -> Result<Option<Device>, DbError> {
        let device = sqlx::query_as::<_, Device>(
            r"SELECT * FROM devices WHERE user_id = $1 AND user_agent = $2",
        )
        .bind(user_id.as_uuid())
        .bind(user_agent)
        .fetch_optional(&self.pool)
        .await?;

        Ok(device)
    }

    async fn find_by_id(&self, id: DeviceId) -> Result<Option<Device>, DbError> {
        let device = sqlx::query_as::<_, Device>(r"SELECT * FROM devices WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(device)
    }

    async fn find_active_by_user(&self, user_id: UserId) -> Result<Vec<Device>, DbError> {
        let devices = sqlx::query_as::<_, Device>(
            r"
            SELECT * FROM devices
            WHERE user_id = $1 AND is_active = TRUE
            ORDER BY last_active DESC
            ",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(devices)
    }

    async fn save(&self, device: &Device) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO devices (
                id, user_id, user_agent, ip, last_active, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET ip = EXCLUDED.ip,
                last_active = EXCLUDED.last_active,
                is_active = EXCLUDED.is_active
            ",
        )
        .bind(device.id)
        .bind(device.user_id)
        .bind(&device.user_agent)
        .bind(&device.ip)
        .bind(device.last_active)
        .bind(device.is_active)
        .bind(device.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Refresh tokens backed by the `refresh_tokens` table.
#[derive(Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    /// Create a store over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DbError> {
        let row =
            sqlx::query_as::<_, RefreshToken>(r"SELECT * FROM refresh_tokens WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row)
    }

    async fn find_by_device(&self, device_id: DeviceId) -> Result<Option<RefreshToken>, DbError> {
        let row =
            sqlx::query_as::<_, RefreshToken>(r"SELECT * FROM refresh_tokens WHERE device_id = $1")
                .bind(device_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row)
    }

    async fn save(&self, token: &RefreshToken) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (
                id, user_id, device_id, token, expires_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET token = EXCLUDED.token,
                expires_at = EXCLUDED.expires_at,
                created_at = EXCLUDED.created_at
            ",
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(token.device_id)
        .bind(&token.token)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: TokenId) -> Result<(), DbError> {
        sqlx::query(r"DELETE FROM refresh_tokens WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_by_user_and_device(
        &self,
        user_id: UserId,
        device_id: DeviceId,
    ) -> Result<(), DbError> {
        sqlx::query(r"DELETE FROM refresh_tokens WHERE user_id = $1 AND device_id = $2")
            .bind(user_id.as_uuid())
            .bind(device_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<(), DbError> {
        sqlx::query(r"DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
