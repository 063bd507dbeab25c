//! Email dispatch for one-time passcodes.
//!
//! Services depend on the [`EmailNotifier`] trait; the production
//! implementation talks to the Resend HTTP API. [`MockEmailSender`] is
//! exported for tests so suites can capture the plaintext codes that
//! otherwise only travel in email bodies.

use async_trait::async_trait;
use serde_json::json;
use shoply_db::OtpPurpose;
use std::sync::{Arc, Mutex};

use crate::error::ApiAuthError;

/// Default Resend API endpoint.
pub const RESEND_BASE_URL: &str = "https://api.resend.com";

/// Outbound OTP email seam.
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    /// Send a one-time passcode to `to`, with a purpose-appropriate subject.
    async fn send_otp(&self, to: &str, code: &str, purpose: OtpPurpose)
        -> Result<(), ApiAuthError>;
}

/// Configuration for the Resend email client.
#[derive(Clone)]
pub struct ResendConfig {
    /// Resend API key.
    pub api_key: String,
    /// Sender address shown to the recipient.
    pub from_email: String,
    /// API base URL, overridable for tests.
    pub base_url: String,
}

impl ResendConfig {
    /// Build a config against the public Resend endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>, from_email: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            from_email: from_email.into(),
            base_url: RESEND_BASE_URL.to_string(),
        }
    }
}

/// OTP delivery over the Resend HTTP API.
#[derive(Clone)]
pub struct ResendEmailNotifier {
    client: reqwest::Client,
    config: ResendConfig,
}

impl ResendEmailNotifier {
    /// Create a notifier with the given config.
    #[must_use]
    pub fn new(config: ResendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn subject_for(purpose: OtpPurpose) -> &'static str {
        match purpose {
            OtpPurpose::Register => "OTP Registration Code",
            OtpPurpose::ForgotPassword => "OTP Code Reset Password",
        }
    }
}

#[async_trait]
impl EmailNotifier for ResendEmailNotifier {
    async fn send_otp(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), ApiAuthError> {
        let body = json!({
            "from": self.config.from_email,
            "to": [to],
            "subject": Self::subject_for(purpose),
            "html": format!(
                "<p>Your verification code is <strong>{code}</strong>. \
                 It expires in 5 minutes.</p>"
            ),
        });

        let response = self
            .client
            .post(format!("{}/emails", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach email provider: {}", e);
                ApiAuthError::internal(format!("Email dispatch failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Email provider rejected request: {}", status);
            return Err(ApiAuthError::internal(format!(
                "Email dispatch failed with status {status}"
            )));
        }

        tracing::debug!(purpose = %purpose, "OTP email dispatched");
        Ok(())
    }
}

/// A sent email captured by [`MockEmailSender`].
#[derive(Debug, Clone)]
pub struct SentOtp {
    pub to: String,
    pub code: String,
    pub purpose: OtpPurpose,
}

/// In-memory notifier for tests.
#[derive(Clone, Default)]
pub struct MockEmailSender {
    sent: Arc<Mutex<Vec<SentOtp>>>,
}

impl MockEmailSender {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured sends, in dispatch order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentOtp> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// The most recent code sent to `email`, if any.
    #[must_use]
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .ok()?
            .iter()
            .rev()
            .find(|s| s.to == email)
            .map(|s| s.code.clone())
    }
}

#[async_trait]
impl EmailNotifier for MockEmailSender {
    async fn send_otp(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), ApiAuthError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentOtp {
                to: to.to_string(),
                code: code.to_string(),
                purpose,
            });
        }
        Ok(())
    }
}
