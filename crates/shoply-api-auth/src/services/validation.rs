//! Input validation for authentication requests.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ApiAuthError;

/// Minimum password length requirement.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length requirement.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum email length requirement.
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Email validation regex (simplified RFC 5322).
/// The pattern is a constant, so the `expect()` here is acceptable; if it
/// fails, it is a programming error.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$")
        .expect("EMAIL_REGEX is a valid regex pattern")
});

/// Validate an email address.
///
/// Emails are validated for shape only; they are never normalized and are
/// stored and compared exactly as submitted.
pub fn validate_email(email: &str) -> Result<(), ApiAuthError> {
    if email.is_empty() {
        return Err(ApiAuthError::validation("Email must not be empty"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiAuthError::validation(format!(
            "Email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ApiAuthError::validation("Email is not a valid address"));
    }
    Ok(())
}

/// Validate a new password's length.
pub fn validate_password(password: &str) -> Result<(), ApiAuthError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(ApiAuthError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(ApiAuthError::validation(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_emails() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn does_not_normalize_case() {
        assert!(validate_email("User@Example.COM").is_ok());
    }

    #[test]
    fn password_length_bounds() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough1!").is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }
}
