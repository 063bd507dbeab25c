//! One-time verification code entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shoply_core::{CodeId, UserId};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Why a verification code exists.
///
/// A closed enumeration: the purpose string from the transport boundary is
/// parsed exactly once and passed around as this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum OtpPurpose {
    /// Confirming a fresh registration.
    #[serde(rename = "OTP_REGISTER")]
    #[sqlx(rename = "OTP_REGISTER")]
    Register,
    /// Authorizing a password reset.
    #[serde(rename = "OTP_FORGOT_PASSWORD")]
    #[sqlx(rename = "OTP_FORGOT_PASSWORD")]
    ForgotPassword,
}

impl OtpPurpose {
    /// The wire/storage representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Register => "OTP_REGISTER",
            OtpPurpose::ForgotPassword => "OTP_FORGOT_PASSWORD",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown purpose string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPurpose(pub String);

impl fmt::Display for InvalidPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid verification purpose: {}", self.0)
    }
}

impl std::error::Error for InvalidPurpose {}

impl FromStr for OtpPurpose {
    type Err = InvalidPurpose;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OTP_REGISTER" => Ok(OtpPurpose::Register),
            "OTP_FORGOT_PASSWORD" => Ok(OtpPurpose::ForgotPassword),
            other => Err(InvalidPurpose(other.to_string())),
        }
    }
}

/// A one-time passcode row.
///
/// At most one non-deleted row exists per (user, purpose) pair; issuing a
/// new code for the pair overwrites the existing row instead of inserting
/// a second one.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationCode {
    /// Unique identifier.
    pub id: uuid::Uuid,

    /// Owning user.
    pub user_id: uuid::Uuid,

    /// Argon2id hash of the 6-digit code. The plaintext code only travels
    /// in the email.
    pub hashed_code: String,

    /// Hard expiry of the code (issuance + 300 seconds).
    pub expires_at: DateTime<Utc>,

    /// Failed-match counter; the code is dead once this reaches the
    /// attempt ceiling.
    pub attempts: i32,

    /// What this code authorizes.
    pub purpose: OtpPurpose,

    /// Set on a successful match. Only meaningful for the forgot-password
    /// purpose, where the verified row is consumed later by the reset.
    pub is_verified: bool,
}

impl VerificationCode {
    /// Create a fresh code row for a (user, purpose) pair.
    #[must_use]
    pub fn issue(
        user_id: UserId,
        purpose: OtpPurpose,
        hashed_code: &str,
        valid_for: Duration,
    ) -> Self {
        Self {
            id: CodeId::new().as_uuid(),
            user_id: user_id.as_uuid(),
            hashed_code: hashed_code.to_string(),
            expires_at: Utc::now() + valid_for,
            attempts: 0,
            purpose,
            is_verified: false,
        }
    }

    /// Overwrite this row with a newly generated code.
    ///
    /// Resets the attempt counter and restarts the expiry clock; the row
    /// identity and purpose are kept.
    pub fn reissue(&mut self, hashed_code: &str, valid_for: Duration) {
        self.hashed_code = hashed_code.to_string();
        self.attempts = 0;
        self.expires_at = Utc::now() + valid_for;
    }

    /// Count one failed match.
    pub fn record_failed_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Mark the code as successfully matched.
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
    }

    /// Whether the expiry instant has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Whether the attempt ceiling has been reached.
    #[must_use]
    pub fn attempts_exhausted(&self, max_attempts: i32) -> bool {
        self.attempts >= max_attempts
    }

    /// The code ID as a typed `CodeId`.
    #[must_use]
    pub fn code_id(&self) -> CodeId {
        CodeId::from_uuid(self.id)
    }
}
