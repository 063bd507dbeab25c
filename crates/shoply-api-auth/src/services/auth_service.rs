//! Authentication and session lifecycle orchestration.
//!
//! Login, registration, refresh-token rotation, sign-out, and the
//! multi-device session listing. OTP issuance and the reset flow live in
//! [`super::otp_service`]; this service delegates to it for the
//! registration code.

use axum::http::StatusCode;
use shoply_auth::PasswordHasher;
use shoply_db::{Device, OtpPurpose, RefreshToken, User};
use std::sync::Arc;

use crate::error::ApiAuthError;
use crate::models::{
    DeviceContext, DeviceInfoResponse, LoginRequest, LoginResponse, MessageResponse,
    RefreshRequest, RegisterRequest, RegisterResponse, SignOutRequest, TokenPairResponse,
};
use crate::services::otp_service::OtpService;
use crate::services::token_service::TokenService;
use crate::services::validation::{validate_email, validate_password};
use crate::stores::{CredentialStore, DeviceStore, RefreshTokenStore, RoleStore};

/// Role assigned to every newly registered account.
pub const DEFAULT_ROLE: &str = "ROLE_USER";

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    roles: Arc<dyn RoleStore>,
    devices: Arc<dyn DeviceStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    tokens: TokenService,
    otp: OtpService,
    hasher: Arc<PasswordHasher>,
}

impl AuthService {
    /// Create a new authentication service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn CredentialStore>,
        roles: Arc<dyn RoleStore>,
        devices: Arc<dyn DeviceStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        tokens: TokenService,
        otp: OtpService,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            users,
            roles,
            devices,
            refresh_tokens,
            tokens,
            otp,
            hasher,
        }
    }

    /// Authenticate a user and open a session on the calling device.
    ///
    /// The password is checked against the stored hash exactly once. An
    /// unverified account is rejected before any device or token state is
    /// written.
    pub async fn login(
        &self,
        request: LoginRequest,
        ctx: DeviceContext,
    ) -> Result<LoginResponse, ApiAuthError> {
        let with_roles = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(ApiAuthError::InvalidCredentials)?;
        let user = &with_roles.user;

        if !self
            .hasher
            .verify(&request.password, &user.password_hash)?
        {
            tracing::warn!(email = %request.email, "Login failed: bad credentials");
            return Err(ApiAuthError::InvalidCredentials);
        }
        if !user.is_verified {
            return Err(ApiAuthError::AccountNotVerified);
        }

        let access_token = self
            .tokens
            .issue_access_token(&user.email, with_roles.role_ids())?;

        // Same user agent means same device row; refresh it either way.
        let device = match self
            .devices
            .find_by_user_and_agent(user.user_id(), &ctx.user_agent)
            .await?
        {
            Some(mut existing) => {
                existing.touch_activity(&ctx.ip);
                existing.activate();
                existing
            }
            None => Device::register(user.user_id(), &ctx.user_agent, &ctx.ip),
        };
        self.devices.save(&device).await?;

        let refresh_token = self.tokens.issue_refresh_token(&user.email)?;
        self.refresh_tokens
            .delete_by_user_and_device(user.user_id(), device.device_id())
            .await?;
        let row = RefreshToken::issue(
            user.user_id(),
            device.device_id(),
            &refresh_token,
            self.tokens.refresh_row_validity(),
        );
        self.refresh_tokens.save(&row).await?;

        tracing::info!(user_id = %user.user_id(), device_id = %device.device_id(), "User logged in");
        Ok(LoginResponse::bearer(access_token, refresh_token))
    }

    /// Exchange a refresh token for a fresh token pair.
    ///
    /// The presented string must match a stored row exactly; the row is
    /// rotated in place so the old value is dead after this returns.
    /// Authorities are re-derived from the user's current roles.
    pub async fn refresh(
        &self,
        request: RefreshRequest,
        ctx: DeviceContext,
    ) -> Result<TokenPairResponse, ApiAuthError> {
        let mut row = self
            .refresh_tokens
            .find_by_token(&request.refresh_token)
            .await?
            .ok_or_else(|| ApiAuthError::InvalidToken("Refresh token not recognized".to_string()))?;

        if row.is_expired() {
            return Err(ApiAuthError::TokenExpired);
        }

        let with_roles = self
            .users
            .find_by_id(row.user_id())
            .await?
            .ok_or_else(|| ApiAuthError::not_found("User", row.user_id().to_string()))?;
        let user = &with_roles.user;

        let mut device = self
            .devices
            .find_by_id(row.device_id())
            .await?
            .ok_or_else(|| ApiAuthError::not_found("Device", row.device_id().to_string()))?;
        device.touch_activity(&ctx.ip);
        self.devices.save(&device).await?;

        let access_token = self
            .tokens
            .issue_access_token(&user.email, with_roles.role_ids())?;
        let refresh_token = self.tokens.issue_refresh_token(&user.email)?;
        row.rotate(&refresh_token, self.tokens.refresh_row_validity());
        self.refresh_tokens.save(&row).await?;

        tracing::info!(user_id = %user.user_id(), device_id = %device.device_id(), "Tokens rotated");
        Ok(TokenPairResponse {
            access_token,
            refresh_token,
        })
    }

    /// Close the session holding the given refresh token.
    ///
    /// Deactivates the device and deletes the token row. Not idempotent: a
    /// second call with the same token fails because the row is gone.
    pub async fn sign_out(&self, request: SignOutRequest) -> Result<MessageResponse, ApiAuthError> {
        let row = self
            .refresh_tokens
            .find_by_token(&request.refresh_token)
            .await?
            .ok_or_else(|| ApiAuthError::InvalidToken("Refresh token not recognized".to_string()))?;

        if let Some(mut device) = self.devices.find_by_id(row.device_id()).await? {
            device.deactivate();
            self.devices.save(&device).await?;
        }
        self.refresh_tokens.delete(row.token_id()).await?;

        tracing::info!(user_id = %row.user_id(), device_id = %row.device_id(), "User signed out");
        Ok(MessageResponse::new("Signed out successfully"))
    }

    /// List a user's devices with an open session, most recently active
    /// first. Read-only.
    pub async fn list_active_devices(
        &self,
        email: &str,
    ) -> Result<Vec<DeviceInfoResponse>, ApiAuthError> {
        let with_roles = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiAuthError::not_found("User", email))?;

        let devices = self
            .devices
            .find_active_by_user(with_roles.user.user_id())
            .await?;

        let mut out = Vec::with_capacity(devices.len());
        for device in &devices {
            let token_expiry = self
                .refresh_tokens
                .find_by_device(device.device_id())
                .await?
                .map(|row| row.expires_at);
            out.push(DeviceInfoResponse::from_device(device, token_expiry));
        }

        Ok(out)
    }

    /// Register a new account and email its registration code.
    ///
    /// Returns `201 Created` for a genuinely new account. Registering an
    /// email that exists but never confirmed its code re-issues the code
    /// instead of failing, returning `200 OK`.
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<(StatusCode, RegisterResponse), ApiAuthError> {
        validate_email(&request.email)?;

        if let Some(existing) = self.users.find_by_email(&request.email).await? {
            if existing.user.is_verified {
                return Err(ApiAuthError::EmailAlreadyRegistered(request.email));
            }
            // Unverified duplicate: treat as a resend, not a conflict.
            self.otp
                .issue_otp(&existing.user, OtpPurpose::Register)
                .await?;
            return Ok((
                StatusCode::OK,
                RegisterResponse {
                    email: existing.user.email,
                    full_name: existing.user.full_name,
                },
            ));
        }

        if request.password != request.confirm_password {
            return Err(ApiAuthError::PasswordMismatch);
        }
        validate_password(&request.password)?;

        let default_role = self
            .roles
            .find_by_name(DEFAULT_ROLE)
            .await?
            .ok_or_else(|| ApiAuthError::RoleNotFound(DEFAULT_ROLE.to_string()))?;

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::register(&request.full_name, &request.email, &password_hash);
        self.users
            .insert(&user, &[default_role.role.role_id()])
            .await?;

        self.otp.issue_otp(&user, OtpPurpose::Register).await?;

        tracing::info!(user_id = %user.user_id(), "User registered");
        Ok((
            StatusCode::CREATED,
            RegisterResponse {
                email: user.email,
                full_name: user.full_name,
            },
        ))
    }
}
