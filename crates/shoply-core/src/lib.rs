//! shoply core library
//!
//! Shared types for the shoply admin backend.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (`UserId`, `RoleId`, `DeviceId`, ...)
//!
//! # Example
//!
//! ```
//! use shoply_core::{UserId, DeviceId};
//!
//! let user_id = UserId::new();
//! let device_id = DeviceId::new();
//! ```

pub mod ids;

pub use ids::{CodeId, DeviceId, ParseIdError, PermissionId, RoleId, TokenId, UserId};
