//! Entity models and database error types for shoply.
//!
//! Entities here are plain data: IDs and timestamps are assigned by explicit
//! factory functions, and audit fields are updated by an explicit
//! [`User::touch`] step called from the service layer before a save. There
//! are no persistence-lifecycle hooks.

mod error;
pub mod models;

pub use error::DbError;
pub use models::{
    Device, InvalidPurpose, OtpPurpose, Permission, RefreshToken, Role, RoleWithPermissions, User,
    UserWithRoles, VerificationCode, UNKNOWN_CLIENT,
};
