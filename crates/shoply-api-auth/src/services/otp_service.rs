//! OTP lifecycle: issuance, verification, resend, and the password reset
//! flow it gates.

use chrono::Duration;
use shoply_auth::{generate_otp, PasswordHasher};
use shoply_db::{OtpPurpose, User, VerificationCode};
use std::sync::Arc;

use crate::error::ApiAuthError;
use crate::models::{
    ForgotPasswordRequest, MessageResponse, OtpVerificationRequest, ResendOtpRequest,
    ResetPasswordRequest,
};
use crate::services::validation::validate_password;
use crate::stores::{CredentialStore, VerificationCodeStore};

use super::email::EmailNotifier;

/// OTP validity window in seconds.
pub const OTP_VALIDITY_SECONDS: i64 = 300;

/// Wrong submissions allowed before a code is dead.
pub const MAX_OTP_ATTEMPTS: i32 = 5;

/// One-time passcode service.
#[derive(Clone)]
pub struct OtpService {
    users: Arc<dyn CredentialStore>,
    codes: Arc<dyn VerificationCodeStore>,
    email: Arc<dyn EmailNotifier>,
    hasher: Arc<PasswordHasher>,
}

impl OtpService {
    /// Create a new OTP service.
    pub fn new(
        users: Arc<dyn CredentialStore>,
        codes: Arc<dyn VerificationCodeStore>,
        email: Arc<dyn EmailNotifier>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            users,
            codes,
            email,
            hasher,
        }
    }

    /// Issue (or re-issue) a code for a (user, purpose) pair and email it.
    ///
    /// Overwrites any existing row for the pair: the attempt counter and
    /// expiry clock restart, so at most one live code exists per pair.
    pub async fn issue_otp(&self, user: &User, purpose: OtpPurpose) -> Result<(), ApiAuthError> {
        match purpose {
            OtpPurpose::Register if user.is_verified => {
                return Err(ApiAuthError::AlreadyVerified);
            }
            OtpPurpose::ForgotPassword if !user.is_verified => {
                return Err(ApiAuthError::UserNotVerified);
            }
            _ => {}
        }

        let plaintext = generate_otp();
        let hashed = self.hasher.hash(&plaintext)?;
        let validity = Duration::seconds(OTP_VALIDITY_SECONDS);

        let code = match self
            .codes
            .find_by_user_and_purpose(user.user_id(), purpose)
            .await?
        {
            Some(mut existing) => {
                existing.reissue(&hashed, validity);
                existing
            }
            None => VerificationCode::issue(user.user_id(), purpose, &hashed, validity),
        };
        self.codes.save(&code).await?;

        self.email.send_otp(&user.email, &plaintext, purpose).await?;

        tracing::info!(user_id = %user.user_id(), purpose = %purpose, "OTP issued");
        Ok(())
    }

    /// Confirm a submitted code.
    ///
    /// Checks run in a fixed order: attempts ceiling, then expiry, then the
    /// hash comparison. A mismatch increments and persists the attempt
    /// counter before failing, so counting survives the error path.
    pub async fn verify_otp(
        &self,
        request: OtpVerificationRequest,
    ) -> Result<MessageResponse, ApiAuthError> {
        let purpose: OtpPurpose = request
            .purpose
            .parse()
            .map_err(|_| ApiAuthError::InvalidPurpose(request.purpose.clone()))?;

        let mut with_roles = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ApiAuthError::not_found("User", &request.email))?;

        let mut code = self
            .codes
            .find_by_user_and_purpose(with_roles.user.user_id(), purpose)
            .await?
            .ok_or(ApiAuthError::OtpNotFound)?;

        if code.attempts_exhausted(MAX_OTP_ATTEMPTS) {
            return Err(ApiAuthError::TooManyAttempts);
        }
        if code.is_expired() {
            return Err(ApiAuthError::OtpExpired);
        }
        if !self.hasher.verify(&request.otp, &code.hashed_code)? {
            code.record_failed_attempt();
            self.codes.save(&code).await?;
            tracing::warn!(
                user_id = %with_roles.user.user_id(),
                attempts = code.attempts,
                "OTP mismatch"
            );
            return Err(ApiAuthError::InvalidOtp);
        }

        code.mark_verified();
        self.codes.save(&code).await?;

        if purpose == OtpPurpose::Register {
            with_roles.user.mark_verified();
            with_roles.user.touch(&request.email);
            self.users.save(&with_roles.user).await?;
            self.codes.delete(code.code_id()).await?;
        }

        tracing::info!(user_id = %with_roles.user.user_id(), purpose = %purpose, "OTP verified");
        Ok(MessageResponse::new("OTP verified successfully"))
    }

    /// Re-issue a code for an already started flow.
    pub async fn resend_otp(
        &self,
        request: ResendOtpRequest,
    ) -> Result<MessageResponse, ApiAuthError> {
        let purpose: OtpPurpose = request
            .purpose
            .parse()
            .map_err(|_| ApiAuthError::InvalidPurpose(request.purpose.clone()))?;

        let with_roles = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ApiAuthError::not_found("User", &request.email))?;
        let user = &with_roles.user;

        match purpose {
            OtpPurpose::Register => {
                if user.is_verified {
                    return Err(ApiAuthError::AlreadyVerified);
                }
            }
            OtpPurpose::ForgotPassword => {
                if !user.is_verified {
                    return Err(ApiAuthError::UserNotVerified);
                }
                // Resend never silently starts a reset flow.
                if self
                    .codes
                    .find_by_user_and_purpose(user.user_id(), purpose)
                    .await?
                    .is_none()
                {
                    return Err(ApiAuthError::NoActiveResetFlow);
                }
            }
        }

        self.issue_otp(user, purpose).await?;
        Ok(MessageResponse::new("OTP resent successfully"))
    }

    /// Start the password reset flow by issuing a forgot-password code.
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> Result<MessageResponse, ApiAuthError> {
        let with_roles = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ApiAuthError::not_found("User", &request.email))?;

        self.issue_otp(&with_roles.user, OtpPurpose::ForgotPassword)
            .await?;
        Ok(MessageResponse::new("OTP sent to your email"))
    }

    /// Complete the password reset flow.
    ///
    /// Requires a verified forgot-password code that is still inside its
    /// original validity window; a verified-but-stale code rejects the
    /// reset.
    pub async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiAuthError> {
        let mut with_roles = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ApiAuthError::not_found("User", &request.email))?;

        let code = self
            .codes
            .find_by_user_and_purpose(with_roles.user.user_id(), OtpPurpose::ForgotPassword)
            .await?
            .ok_or(ApiAuthError::NoValidOtp)?;

        if !code.is_verified {
            return Err(ApiAuthError::OtpNotVerified);
        }
        if code.is_expired() {
            return Err(ApiAuthError::OtpExpired);
        }
        if request.new_password != request.confirm_password {
            return Err(ApiAuthError::PasswordMismatch);
        }
        validate_password(&request.new_password)?;

        let hashed = self.hasher.hash(&request.new_password)?;
        with_roles.user.change_password(&hashed);
        with_roles.user.touch(&request.email);
        self.users.save(&with_roles.user).await?;

        self.codes.delete(code.code_id()).await?;

        tracing::info!(user_id = %with_roles.user.user_id(), "Password reset");
        Ok(MessageResponse::new("Password reset successfully"))
    }
}
