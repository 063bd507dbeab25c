//! Role and permission entity models.
//!
//! This core only reads roles: registration resolves the default
//! `ROLE_USER`, and token issuance embeds role IDs. Role/permission CRUD
//! belongs to the administrative services.

use chrono::{DateTime, Utc};
use shoply_core::{PermissionId, RoleId};
use sqlx::FromRow;

/// A role assignable to users.
#[derive(Debug, Clone, FromRow)]
pub struct Role {
    pub id: uuid::Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub is_deleted: bool,
}

impl Role {
    /// Create a new role record.
    #[must_use]
    pub fn create(name: &str, actor: &str) -> Self {
        Self {
            id: RoleId::new().as_uuid(),
            name: name.to_string(),
            created_at: Utc::now(),
            created_by: Some(actor.to_string()),
            updated_at: None,
            updated_by: None,
            is_deleted: false,
        }
    }

    /// The role ID as a typed `RoleId`.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        RoleId::from_uuid(self.id)
    }
}

/// A permission: one (path, method) endpoint grouped under a module.
#[derive(Debug, Clone, FromRow)]
pub struct Permission {
    pub id: uuid::Uuid,
    pub name: String,
    pub path: String,
    pub method: String,
    pub module: String,
}

impl Permission {
    /// The permission ID as a typed `PermissionId`.
    #[must_use]
    pub fn permission_id(&self) -> PermissionId {
        PermissionId::from_uuid(self.id)
    }
}

/// A role with its permissions eagerly loaded.
#[derive(Debug, Clone)]
pub struct RoleWithPermissions {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_stamps_actor_and_time() {
        let role = Role::create("ROLE_USER", "system");
        assert_eq!(role.name, "ROLE_USER");
        assert_eq!(role.created_by.as_deref(), Some("system"));
        assert!(!role.is_deleted);
    }

    #[test]
    fn role_id_wraps_uuid() {
        let role = Role::create("ROLE_ADMIN", "system");
        assert_eq!(role.role_id().as_uuid(), role.id);
    }
}
