use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::permission::Permission;

/// A role and the full set of permissions granted to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// System roles cannot be deleted.
    pub is_system: bool,
    pub permissions: Vec<RolePermission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn permission_ids(&self) -> BTreeSet<i64> {
        self.permissions.iter().map(|p| p.permission_id).collect()
    }
}

/// One grant on a role, with the permission it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermission {
    pub permission_id: i64,
    pub permission: Permission,
}

impl From<Permission> for RolePermission {
    fn from(permission: Permission) -> Self {
        RolePermission {
            permission_id: permission.id,
            permission,
        }
    }
}

/// Body of `POST /api/v1/roles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRole {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permission_ids: Vec<i64>,
}

/// Body of `PUT /api/v1/roles/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `PUT /api/v1/roles/{id}/permissions`: the complete replacement set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSetUpdate {
    pub permission_ids: Vec<i64>,
}

impl PermissionSetUpdate {
    /// Requested ids, deduplicated and sorted.
    pub fn normalized_ids(&self) -> Vec<i64> {
        let set: BTreeSet<i64> = self.permission_ids.iter().copied().collect();
        set.into_iter().collect()
    }
}
