//! JWT and credential-hashing primitives for shoply.
//!
//! This crate provides:
//! - JWT HS512 encoding and decoding for access and refresh tokens
//! - Argon2id hashing, used for both passwords and OTP codes
//! - Cryptographically secure 6-digit OTP generation
//!
//! # Example
//!
//! ```rust
//! use shoply_auth::{encode_token, decode_token, Claims, PasswordHasher};
//!
//! let secret = b"test-signing-secret";
//! let claims = Claims::builder()
//!     .subject("alice@example.com")
//!     .expires_in_secs(900)
//!     .build();
//!
//! let token = encode_token(&claims, secret).unwrap();
//! let decoded = decode_token(&token, secret).unwrap();
//! assert_eq!(decoded.sub, "alice@example.com");
//!
//! let hasher = PasswordHasher::default();
//! let hash = hasher.hash("Passw0rd!").unwrap();
//! assert!(hasher.verify("Passw0rd!", &hash).unwrap());
//! ```

mod claims;
mod error;
mod jwt;
mod otp;
mod password;

pub use claims::{Claims, ClaimsBuilder};
pub use error::AuthError;
pub use jwt::{decode_token, decode_token_with_config, encode_token, ValidationConfig};
pub use otp::{generate_otp, OTP_DIGITS};
pub use password::PasswordHasher;
