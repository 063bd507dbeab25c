//! Device entity model.

use chrono::{DateTime, Utc};
use shoply_core::{DeviceId, UserId};
use sqlx::FromRow;

/// Sentinel stored when a request carries no user agent or client IP.
pub const UNKNOWN_CLIENT: &str = "Unknown";

/// A device a user has signed in from.
///
/// Identity within one user's account is the user-agent string: logging in
/// twice from the same user agent reuses the row, updating its IP and
/// last-active timestamp. A row is never deleted; sign-out only flips
/// `is_active` off.
#[derive(Debug, Clone, FromRow)]
pub struct Device {
    /// Unique identifier.
    pub id: uuid::Uuid,

    /// Owning user.
    pub user_id: uuid::Uuid,

    /// User agent observed at login, or [`UNKNOWN_CLIENT`].
    pub user_agent: String,

    /// Client IP at the most recent activity, or [`UNKNOWN_CLIENT`].
    pub ip: String,

    /// When the device last logged in or refreshed a token.
    pub last_active: DateTime<Utc>,

    /// Whether a session is currently open on this device.
    pub is_active: bool,

    /// When the device was first seen.
    pub created_at: DateTime<Utc>,
}

impl Device {
    /// Record a device seen for the first time.
    #[must_use]
    pub fn register(user_id: UserId, user_agent: &str, ip: &str) -> Self {
        let now = Utc::now();
        Self {
            id: DeviceId::new().as_uuid(),
            user_id: user_id.as_uuid(),
            user_agent: user_agent.to_string(),
            ip: ip.to_string(),
            last_active: now,
            is_active: true,
            created_at: now,
        }
    }

    /// Refresh the IP and last-active timestamp on login or token refresh.
    ///
    /// Leaves `is_active` untouched; only a login reopens a session.
    pub fn touch_activity(&mut self, ip: &str) {
        self.ip = ip.to_string();
        self.last_active = Utc::now();
    }

    /// Open a session on this device.
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Close the session on this device.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// The device ID as a typed `DeviceId`.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        DeviceId::from_uuid(self.id)
    }
}
