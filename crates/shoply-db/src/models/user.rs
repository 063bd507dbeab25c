//! User entity model.

use chrono::{DateTime, NaiveDate, Utc};
use shoply_core::{RoleId, UserId};
use sqlx::FromRow;

use crate::models::role::Role;

/// A user account.
///
/// Created unverified by registration; `is_verified` flips to true only
/// through successful registration-OTP confirmation. Rows are soft-deleted
/// (`is_deleted`), never removed, so an email is never reassigned while an
/// old row exists.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique identifier.
    pub id: uuid::Uuid,

    /// Display name.
    pub full_name: String,

    /// Email address (unique across all rows, compared as stored).
    pub email: String,

    /// Argon2id password hash.
    pub password_hash: String,

    /// Optional profile fields.
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub avatar: Option<String>,
    pub date_of_birth: Option<NaiveDate>,

    /// Whether the account is active (false = deactivated by an admin).
    pub is_active: bool,

    /// Soft-delete flag.
    pub is_deleted: bool,

    /// Whether the registration OTP has been confirmed.
    pub is_verified: bool,

    /// Audit fields. The actor is always passed in explicitly; there is no
    /// ambient "current principal" lookup.
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl User {
    /// Create a new unverified account from registration input.
    ///
    /// The registrant is their own creation actor.
    #[must_use]
    pub fn register(full_name: &str, email: &str, password_hash: &str) -> Self {
        Self {
            id: UserId::new().as_uuid(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            phone_number: None,
            address: None,
            avatar: None,
            date_of_birth: None,
            is_active: true,
            is_deleted: false,
            is_verified: false,
            created_at: Utc::now(),
            created_by: Some(email.to_string()),
            updated_at: None,
            updated_by: None,
        }
    }

    /// Stamp the audit fields before a save.
    pub fn touch(&mut self, actor: &str) {
        self.updated_at = Some(Utc::now());
        self.updated_by = Some(actor.to_string());
    }

    /// Mark the registration OTP as confirmed.
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
    }

    /// Replace the stored password hash.
    pub fn change_password(&mut self, password_hash: &str) {
        self.password_hash = password_hash.to_string();
    }

    /// The user ID as a typed `UserId`.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.id)
    }
}

/// A user together with their eagerly loaded roles.
///
/// Login and refresh both need the role set to build the `roleIds` claim,
/// so the credential store returns this pair in one lookup.
#[derive(Debug, Clone)]
pub struct UserWithRoles {
    pub user: User,
    pub roles: Vec<Role>,
}

impl UserWithRoles {
    /// Role IDs for the access-token claim.
    #[must_use]
    pub fn role_ids(&self) -> Vec<RoleId> {
        self.roles.iter().map(|r| RoleId::from_uuid(r.id)).collect()
    }
}
