//! Response payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shoply_db::Device;

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl LoginResponse {
    /// Build a bearer token pair.
    #[must_use]
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
        }
    }
}

/// Successful token rotation.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub email: String,
    pub full_name: String,
}

/// Generic acknowledgement for flows that return no data.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Build an acknowledgement.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One entry in the active-device listing.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfoResponse {
    pub user_agent: String,
    pub ip: String,
    pub last_active: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Row-level expiry of the session's refresh token, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expiry: Option<DateTime<Utc>>,
}

impl DeviceInfoResponse {
    /// Project a device row plus its refresh-token expiry.
    #[must_use]
    pub fn from_device(device: &Device, token_expiry: Option<DateTime<Utc>>) -> Self {
        Self {
            user_agent: device.user_agent.clone(),
            ip: device.ip.clone(),
            last_active: device.last_active,
            is_active: device.is_active,
            created_at: device.created_at,
            token_expiry,
        }
    }
}
