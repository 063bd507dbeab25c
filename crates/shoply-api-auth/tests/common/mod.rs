//! Test helpers for the shoply-api-auth integration tests.
//!
//! Provides in-memory implementations of the persistence seams, plus a
//! fully wired service environment with a mock email sender so tests can
//! read the plaintext codes that would otherwise only travel in email.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use shoply_auth::PasswordHasher;
use shoply_core::{CodeId, DeviceId, RoleId, TokenId, UserId};
use shoply_db::{
    DbError, Device, OtpPurpose, RefreshToken, Role, RoleWithPermissions, User, UserWithRoles,
    VerificationCode,
};

use shoply_api_auth::services::{
    AuthService, MockEmailSender, OtpService, TokenConfig, TokenService, DEFAULT_ROLE,
};
use shoply_api_auth::stores::{
    CredentialStore, DeviceStore, RefreshTokenStore, RoleStore, VerificationCodeStore,
};

/// HS512 signing secret for tests.
pub const TEST_SECRET: &[u8] = b"integration-test-secret-that-is-long-enough-for-hmac-sha512-ok!!";

#[derive(Default)]
struct State {
    users: Vec<User>,
    user_roles: HashMap<Uuid, Vec<RoleId>>,
    roles: Vec<Role>,
    codes: Vec<VerificationCode>,
    devices: Vec<Device>,
    tokens: Vec<RefreshToken>,
}

/// In-memory backing store implementing every persistence seam.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a role into the catalog and return its ID.
    pub fn seed_role(&self, name: &str) -> RoleId {
        let role = Role::create(name, "system");
        let id = role.role_id();
        self.state.lock().unwrap().roles.push(role);
        id
    }

    /// Replace a user's role assignments.
    pub fn assign_roles(&self, email: &str, roles: &[RoleId]) {
        let mut state = self.state.lock().unwrap();
        let user_id = state
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.id)
            .expect("user exists");
        state.user_roles.insert(user_id, roles.to_vec());
    }

    /// Current state of a user row.
    pub fn user(&self, email: &str) -> Option<User> {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Current state of a verification code row.
    pub fn code(&self, email: &str, purpose: OtpPurpose) -> Option<VerificationCode> {
        let state = self.state.lock().unwrap();
        let user_id = state.users.iter().find(|u| u.email == email)?.id;
        state
            .codes
            .iter()
            .find(|c| c.user_id == user_id && c.purpose == purpose)
            .cloned()
    }

    /// All device rows for a user, active or not.
    pub fn devices(&self, email: &str) -> Vec<Device> {
        let state = self.state.lock().unwrap();
        let Some(user_id) = state.users.iter().find(|u| u.email == email).map(|u| u.id) else {
            return Vec::new();
        };
        state
            .devices
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect()
    }

    /// All refresh-token rows for a user.
    pub fn refresh_tokens(&self, email: &str) -> Vec<RefreshToken> {
        let state = self.state.lock().unwrap();
        let Some(user_id) = state.users.iter().find(|u| u.email == email).map(|u| u.id) else {
            return Vec::new();
        };
        state
            .tokens
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Backdate a code's expiry so it reads as expired.
    pub fn force_code_expiry(&self, email: &str, purpose: OtpPurpose) {
        let mut state = self.state.lock().unwrap();
        let user_id = state
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.id)
            .expect("user exists");
        if let Some(code) = state
            .codes
            .iter_mut()
            .find(|c| c.user_id == user_id && c.purpose == purpose)
        {
            code.expires_at = Utc::now() - Duration::seconds(1);
        }
    }

    /// Backdate a refresh-token row's expiry so it reads as expired.
    pub fn force_token_expiry(&self, token: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.tokens.iter_mut().find(|t| t.token == token) {
            row.expires_at = Utc::now() - Duration::seconds(1);
        }
    }

    /// Backdate a device's last-active timestamp.
    pub fn set_device_last_active(&self, email: &str, user_agent: &str, at: DateTime<Utc>) {
        let mut state = self.state.lock().unwrap();
        let user_id = state
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.id)
            .expect("user exists");
        if let Some(device) = state
            .devices
            .iter_mut()
            .find(|d| d.user_id == user_id && d.user_agent == user_agent)
        {
            device.last_active = at;
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithRoles>, DbError> {
        let state = self.state.lock().unwrap();
        let Some(user) = state
            .users
            .iter()
            .find(|u| u.email == email && !u.is_deleted)
            .cloned()
        else {
            return Ok(None);
        };
        let role_ids = state.user_roles.get(&user.id).cloned().unwrap_or_default();
        let roles = state
            .roles
            .iter()
            .filter(|r| role_ids.contains(&r.role_id()))
            .cloned()
            .collect();
        Ok(Some(UserWithRoles { user, roles }))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserWithRoles>, DbError> {
        let email = {
            let state = self.state.lock().unwrap();
            state
                .users
                .iter()
                .find(|u| u.id == id.as_uuid())
                .map(|u| u.email.clone())
        };
        match email {
            Some(email) => self.find_by_email(&email).await,
            None => Ok(None),
        }
    }

    async fn insert(&self, user: &User, roles: &[RoleId]) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        state.users.push(user.clone());
        state.user_roles.insert(user.id, roles.to_vec());
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.users.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<RoleWithPermissions>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .roles
            .iter()
            .find(|r| r.name == name && !r.is_deleted)
            .cloned()
            .map(|role| RoleWithPermissions {
                role,
                permissions: Vec::new(),
            }))
    }
}

#[async_trait]
impl VerificationCodeStore for MemoryStore {
    async fn find_by_user_and_purpose(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
    ) -> Result<Option<VerificationCode>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .codes
            .iter()
            .find(|c| c.user_id == user_id.as_uuid() && c.purpose == purpose)
            .cloned())
    }

    async fn save(&self, code: &VerificationCode) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.codes.iter_mut().find(|c| c.id == code.id) {
            *existing = code.clone();
        } else {
            state.codes.push(code.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: CodeId) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        state.codes.retain(|c| c.id != id.as_uuid());
        Ok(())
    }
}

#[async_trait]
impl DeviceStore for MemoryStore {
    async fn find_by_user_and_agent(
        &self,
        user_id: UserId,
        user_agent: &str,
    ) -> Result<Option<Device>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .devices
            .iter()
            .find(|d| d.user_id == user_id.as_uuid() && d.user_agent == user_agent)
            .cloned())
    }

    async fn find_by_id(&self, id: DeviceId) -> Result<Option<Device>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .devices
            .iter()
            .find(|d| d.id == id.as_uuid())
            .cloned())
    }

    async fn find_active_by_user(&self, user_id: UserId) -> Result<Vec<Device>, DbError> {
        let state = self.state.lock().unwrap();
        let mut devices: Vec<Device> = state
            .devices
            .iter()
            .filter(|d| d.user_id == user_id.as_uuid() && d.is_active)
            .cloned()
            .collect();
        devices.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        Ok(devices)
    }

    async fn save(&self, device: &Device) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.devices.iter_mut().find(|d| d.id == device.id) {
            *existing = device.clone();
        } else {
            state.devices.push(device.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn find_by_device(&self, device_id: DeviceId) -> Result<Option<RefreshToken>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tokens
            .iter()
            .find(|t| t.device_id == device_id.as_uuid())
            .cloned())
    }

    async fn save(&self, token: &RefreshToken) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.tokens.iter_mut().find(|t| t.id == token.id) {
            *existing = token.clone();
        } else {
            state.tokens.push(token.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: TokenId) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        state.tokens.retain(|t| t.id != id.as_uuid());
        Ok(())
    }

    async fn delete_by_user_and_device(
        &self,
        user_id: UserId,
        device_id: DeviceId,
    ) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        state
            .tokens
            .retain(|t| !(t.user_id == user_id.as_uuid() && t.device_id == device_id.as_uuid()));
        Ok(())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        state.tokens.retain(|t| t.user_id != user_id.as_uuid());
        Ok(())
    }
}

/// Fully wired service environment over in-memory stores.
pub struct TestEnv {
    pub store: MemoryStore,
    pub email: MockEmailSender,
    pub auth: AuthService,
    pub otp: OtpService,
}

/// Build a test environment with the default role seeded and a fast
/// (low-cost) Argon2 configuration.
pub fn test_env() -> TestEnv {
    let env = bare_env();
    env.store.seed_role(DEFAULT_ROLE);
    env
}

/// Build a test environment with no roles seeded at all.
pub fn bare_env() -> TestEnv {
    let store = MemoryStore::new();

    let email = MockEmailSender::new();
    let hasher = Arc::new(
        PasswordHasher::with_params(4096, 1, 1).expect("test hasher parameters are valid"),
    );
    let tokens = TokenService::new(TokenConfig::new(TEST_SECRET));

    let otp = OtpService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(email.clone()),
        hasher.clone(),
    );
    let auth = AuthService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        tokens,
        otp.clone(),
        hasher,
    );

    TestEnv {
        store,
        email,
        auth,
        otp,
    }
}

/// Register and verify an account, leaving it ready to log in.
pub async fn register_verified_user(env: &TestEnv, email: &str, password: &str) {
    use shoply_api_auth::models::{OtpVerificationRequest, RegisterRequest};

    env.auth
        .register(RegisterRequest {
            full_name: "Test User".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
        })
        .await
        .expect("registration succeeds");

    let code = env.email.last_code_for(email).expect("OTP was emailed");
    env.otp
        .verify_otp(OtpVerificationRequest {
            email: email.to_string(),
            otp: code,
            purpose: "OTP_REGISTER".to_string(),
        })
        .await
        .expect("OTP verification succeeds");
}
