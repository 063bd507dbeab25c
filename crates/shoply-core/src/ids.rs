//! Strongly typed identifiers.
//!
//! Newtype wrappers around [`uuid::Uuid`] so that the different entity IDs
//! cannot be swapped for each other at a call site. Every entity row in the
//! backend is keyed by one of these.
//!
//! # Example
//!
//! ```
//! use shoply_core::{UserId, RoleId};
//!
//! fn assign_role(user: UserId, role: RoleId) -> String {
//!     format!("{user} -> {role}")
//! }
//!
//! let out = assign_role(UserId::new(), RoleId::new());
//! // assign_role(RoleId::new(), UserId::new()); // does not compile
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error returned when an ID string is not a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// Which ID type failed to parse.
    pub id_type: &'static str,
    /// The underlying UUID parse error message.
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random ID (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self).map_err(|e| ParseIdError {
                    id_type: stringify!($name),
                    message: e.to_string(),
                })
            }
        }
    };
}

define_id!(
    /// Identifier of a user account.
    UserId
);

define_id!(
    /// Identifier of a role.
    ///
    /// Access tokens embed role IDs (not role names); downstream
    /// authorization expands them to permissions.
    RoleId
);

define_id!(
    /// Identifier of a permission.
    PermissionId
);

define_id!(
    /// Identifier of a device row, one per (user, user-agent) pair.
    DeviceId
);

define_id!(
    /// Identifier of a one-time verification code row.
    CodeId
);

define_id!(
    /// Identifier of a refresh-token row.
    TokenId
);
