//! Request payloads.

use serde::Deserialize;
use shoply_db::UNKNOWN_CLIENT;

/// Login credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// New account registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// OTP confirmation for either flow.
///
/// The purpose arrives as a string and is parsed exactly once at the
/// service boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpVerificationRequest {
    pub email: String,
    pub otp: String,
    pub purpose: String,
}

/// OTP re-issue request for either flow.
#[derive(Debug, Clone, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
    pub purpose: String,
}

/// Start of the password reset flow.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Completion of the password reset flow.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Token rotation request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Session termination request.
#[derive(Debug, Clone, Deserialize)]
pub struct SignOutRequest {
    pub refresh_token: String,
}

/// Client identity observed on the transport.
///
/// Built by the HTTP layer from the `User-Agent` header and peer address;
/// absent values are replaced with the `Unknown` sentinel before they reach
/// the services.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    pub user_agent: String,
    pub ip: String,
}

impl DeviceContext {
    /// Build a context, substituting the sentinel for missing values.
    #[must_use]
    pub fn new(user_agent: Option<&str>, ip: Option<&str>) -> Self {
        Self {
            user_agent: user_agent.unwrap_or(UNKNOWN_CLIENT).to_string(),
            ip: ip.unwrap_or(UNKNOWN_CLIENT).to_string(),
        }
    }
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self::new(None, None)
    }
}
