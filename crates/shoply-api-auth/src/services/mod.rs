//! Authentication services.

mod auth_service;
mod email;
mod otp_service;
mod token_service;
pub mod validation;

pub use auth_service::{AuthService, DEFAULT_ROLE};
pub use email::{
    EmailNotifier, MockEmailSender, ResendConfig, ResendEmailNotifier, SentOtp, RESEND_BASE_URL,
};
pub use otp_service::{OtpService, MAX_OTP_ATTEMPTS, OTP_VALIDITY_SECONDS};
pub use token_service::{
    TokenConfig, TokenService, ACCESS_TOKEN_VALIDITY_MINUTES, REFRESH_ROW_VALIDITY_DAYS,
    REFRESH_TOKEN_VALIDITY_DAYS,
};
