//! Authentication and session lifecycle for the shoply admin backend.
//!
//! Covers credential login, OTP-gated registration and password reset,
//! refresh-token rotation, sign-out, and multi-device session listing.
//! The HTTP layer is expected to decode requests into the types in
//! [`models`], call one service operation, and serialize the returned
//! result or [`error::ApiAuthError`].
//!
//! Services reach persistence through the traits in [`stores`]; Postgres
//! implementations are provided there, and tests run the same services
//! against in-memory stores.

pub mod error;
pub mod models;
pub mod services;
pub mod stores;

pub use error::{ApiAuthError, ErrorResponse};
pub use services::{AuthService, MockEmailSender, OtpService, TokenConfig, TokenService};
