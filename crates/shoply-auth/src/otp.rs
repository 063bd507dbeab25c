//! One-time passcode generation.

use rand::{rngs::OsRng, Rng};

/// Number of digits in a generated OTP.
pub const OTP_DIGITS: usize = 6;

/// Generate a random zero-padded 6-digit code (`000000`–`999999`).
///
/// Uses the operating system CSPRNG; OTPs are credentials and must not be
/// predictable from a seeded generator.
#[must_use]
pub fn generate_otp() -> String {
    let n: u32 = OsRng.gen_range(0..1_000_000);
    format!("{n:06}")
}
