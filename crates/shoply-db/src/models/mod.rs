//! Entity models.

mod device;
mod refresh_token;
mod role;
mod user;
mod verification_code;

pub use device::{Device, UNKNOWN_CLIENT};
pub use refresh_token::RefreshToken;
pub use role::{Permission, Role, RoleWithPermissions};
pub use user::{User, UserWithRoles};
pub use verification_code::{InvalidPurpose, OtpPurpose, VerificationCode};
