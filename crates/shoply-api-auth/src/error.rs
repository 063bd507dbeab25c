//! Error types for the authentication API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shoply_auth::AuthError;
use shoply_db::DbError;
use thiserror::Error;

/// Errors that can occur during authentication and session operations.
#[derive(Debug, Error)]
pub enum ApiAuthError {
    /// Request input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The OTP purpose string is not a known purpose.
    #[error("Invalid OTP purpose: {0}")]
    InvalidPurpose(String),

    /// Password and confirmation did not match.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Email/password pair did not match an account.
    #[error("Email or password is incorrect")]
    InvalidCredentials,

    /// Login attempted before the registration OTP was confirmed.
    #[error("Account is not verified")]
    AccountNotVerified,

    /// A registration OTP was requested for an already verified account.
    #[error("Account is already verified")]
    AlreadyVerified,

    /// Email already belongs to a verified account.
    #[error("Email already registered: {0}")]
    EmailAlreadyRegistered(String),

    /// Forgot-password flow attempted on an account that never confirmed
    /// its registration.
    #[error("Account is not verified")]
    UserNotVerified,

    /// No verification code exists for the (user, purpose) pair.
    #[error("No verification code found")]
    OtpNotFound,

    /// The submitted code did not match the stored hash.
    #[error("Invalid OTP")]
    InvalidOtp,

    /// The verification code expired before it was confirmed.
    #[error("OTP has expired")]
    OtpExpired,

    /// Too many wrong codes were submitted for this verification flow.
    #[error("Too many failed attempts, please request a new OTP")]
    TooManyAttempts,

    /// Password reset attempted without a confirmed forgot-password OTP.
    #[error("OTP has not been verified")]
    OtpNotVerified,

    /// Password reset attempted with no forgot-password code on file.
    #[error("No valid OTP found")]
    NoValidOtp,

    /// OTP resend requested for a reset flow that was never started.
    #[error("No active password reset flow")]
    NoActiveResetFlow,

    /// A role the system depends on is missing. Deployment configuration
    /// error, not a client mistake.
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// A presented token is malformed, signed wrong, or unknown.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// A presented token is past its expiry.
    #[error("Token has expired")]
    TokenExpired,

    /// A referenced entity does not exist.
    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiAuthError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error for a named entity.
    pub fn not_found(resource: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            key: key.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<AuthError> for ApiAuthError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => ApiAuthError::TokenExpired,
            AuthError::InvalidSignature
            | AuthError::InvalidAlgorithm
            | AuthError::InvalidToken(_)
            | AuthError::MissingClaim(_) => ApiAuthError::InvalidToken(err.to_string()),
            AuthError::HashingFailed(_) | AuthError::InvalidHashFormat => {
                ApiAuthError::Internal(err.to_string())
            }
        }
    }
}

/// Error response format for API errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiAuthError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            ApiAuthError::InvalidPurpose(purpose) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                format!("Invalid OTP purpose: {purpose}"),
            ),
            ApiAuthError::PasswordMismatch => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                self.to_string(),
            ),
            ApiAuthError::AccountNotVerified
            | ApiAuthError::AlreadyVerified
            | ApiAuthError::UserNotVerified
            | ApiAuthError::InvalidOtp
            | ApiAuthError::OtpExpired
            | ApiAuthError::TooManyAttempts
            | ApiAuthError::OtpNotVerified
            | ApiAuthError::NoValidOtp
            | ApiAuthError::NoActiveResetFlow => {
                (StatusCode::BAD_REQUEST, "bad_request", self.to_string())
            }
            ApiAuthError::InvalidCredentials
            | ApiAuthError::InvalidToken(_)
            | ApiAuthError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string())
            }
            ApiAuthError::OtpNotFound | ApiAuthError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "not_found", self.to_string())
            }
            ApiAuthError::EmailAlreadyRegistered(_) => {
                (StatusCode::CONFLICT, "conflict", self.to_string())
            }
            ApiAuthError::RoleNotFound(name) => {
                tracing::error!("Default role missing: {}", name);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                )
            }
            ApiAuthError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                )
            }
            ApiAuthError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_does_not_say_which_field() {
        let msg = ApiAuthError::InvalidCredentials.to_string();
        assert_eq!(msg, "Email or password is incorrect");
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = ApiAuthError::not_found("User", "a@x.com");
        assert_eq!(err.to_string(), "User not found: a@x.com");
    }

    #[test]
    fn token_errors_map_from_auth() {
        let err: ApiAuthError = AuthError::TokenExpired.into();
        assert!(matches!(err, ApiAuthError::TokenExpired));

        let err: ApiAuthError = AuthError::InvalidSignature.into();
        assert!(matches!(err, ApiAuthError::InvalidToken(_)));
    }

    #[test]
    fn hashing_failures_stay_internal() {
        let err: ApiAuthError = AuthError::HashingFailed("boom".to_string()).into();
        assert!(matches!(err, ApiAuthError::Internal(_)));
    }

    #[test]
    fn response_status_mapping() {
        let cases = [
            (
                ApiAuthError::validation("bad email"),
                StatusCode::BAD_REQUEST,
            ),
            (ApiAuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ApiAuthError::OtpNotFound, StatusCode::NOT_FOUND),
            (
                ApiAuthError::EmailAlreadyRegistered("a@x.com".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                ApiAuthError::internal("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
