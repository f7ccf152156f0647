use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::RbacStore;
use crate::errors::AppError;
use crate::models::{NewRole, Permission, PermissionKey, Role, RolePermission, RoleUpdate};

/// Process-local store used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryRbacStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    next_permission_id: i64,
    next_role_id: i64,
    permissions: BTreeMap<i64, Permission>,
    roles: BTreeMap<i64, StoredRole>,
}

struct StoredRole {
    name: String,
    description: String,
    is_system: bool,
    permission_ids: Vec<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl State {
    fn to_role(&self, id: i64, stored: &StoredRole) -> Role {
        let mut permissions: Vec<RolePermission> = stored
            .permission_ids
            .iter()
            .filter_map(|pid| self.permissions.get(pid))
            .cloned()
            .map(RolePermission::from)
            .collect();
        permissions.sort_by(|a, b| {
            (&a.permission.subject, &a.permission.action, a.permission_id)
                .cmp(&(&b.permission.subject, &b.permission.action, b.permission_id))
        });
        Role {
            id,
            name: stored.name.clone(),
            description: stored.description.clone(),
            is_system: stored.is_system,
            permissions,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }

    fn role(&self, id: i64) -> Result<Role, AppError> {
        self.roles
            .get(&id)
            .map(|stored| self.to_role(id, stored))
            .ok_or(AppError::NotFound)
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.roles
            .iter()
            .any(|(id, r)| r.name == name && Some(*id) != except)
    }

    /// Keep only ids present in the catalog, without duplicates.
    fn known_ids(&self, permission_ids: &[i64]) -> Vec<i64> {
        let mut ids: Vec<i64> = permission_ids
            .iter()
            .copied()
            .filter(|id| self.permissions.contains_key(id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl MemoryRbacStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RbacStore for MemoryRbacStore {
    async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let state = self.state.read().await;
        let mut permissions: Vec<Permission> = state.permissions.values().cloned().collect();
        permissions.sort_by(|a, b| (&a.subject, &a.action, a.id).cmp(&(&b.subject, &b.action, b.id)));
        Ok(permissions)
    }

    async fn upsert_permission(
        &self,
        key: &PermissionKey,
        description: &str,
    ) -> Result<(Permission, bool), AppError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .permissions
            .values()
            .find(|p| p.action == key.action && p.subject == key.subject)
        {
            return Ok((existing.clone(), false));
        }

        state.next_permission_id += 1;
        let permission = Permission {
            id: state.next_permission_id,
            action: key.action.clone(),
            subject: key.subject.clone(),
            description: description.to_string(),
        };
        state.permissions.insert(permission.id, permission.clone());
        Ok((permission, true))
    }

    async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state
            .roles
            .iter()
            .map(|(id, stored)| state.to_role(*id, stored))
            .collect();
        roles.sort_by(|a, b| {
            b.is_system
                .cmp(&a.is_system)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(roles)
    }

    async fn get_role(&self, id: i64) -> Result<Role, AppError> {
        self.state.read().await.role(id)
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .roles
            .iter()
            .find(|(_, r)| r.name == name)
            .map(|(id, stored)| state.to_role(*id, stored)))
    }

    async fn create_role(&self, new_role: &NewRole, is_system: bool) -> Result<Role, AppError> {
        let mut state = self.state.write().await;
        let name = new_role.name.trim().to_string();
        if state.name_taken(&name, None) {
            return Err(AppError::Conflict("Role name already exists".to_string()));
        }

        state.next_role_id += 1;
        let id = state.next_role_id;
        let now = Utc::now();
        let permission_ids = state.known_ids(&new_role.permission_ids);
        state.roles.insert(
            id,
            StoredRole {
                name,
                description: new_role.description.trim().to_string(),
                is_system,
                permission_ids,
                created_at: now,
                updated_at: now,
            },
        );
        state.role(id)
    }

    async fn update_role(&self, id: i64, update: &RoleUpdate) -> Result<Role, AppError> {
        let mut state = self.state.write().await;
        let name = update.name.trim().to_string();
        if !state.roles.contains_key(&id) {
            return Err(AppError::NotFound);
        }
        if state.name_taken(&name, Some(id)) {
            return Err(AppError::Conflict("Role name already exists".to_string()));
        }
        if let Some(stored) = state.roles.get_mut(&id) {
            stored.name = name;
            stored.description = update.description.trim().to_string();
            stored.updated_at = Utc::now();
        }
        state.role(id)
    }

    async fn delete_role(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.roles.remove(&id).map(|_| ()).ok_or(AppError::NotFound)
    }

    async fn set_role_permissions(&self, id: i64, permission_ids: &[i64]) -> Result<Role, AppError> {
        let mut state = self.state.write().await;
        let ids = state.known_ids(permission_ids);
        let stored = state.roles.get_mut(&id).ok_or(AppError::NotFound)?;
        stored.permission_ids = ids;
        stored.updated_at = Utc::now();
        state.role(id)
    }

    async fn migrate(&self) -> Result<(), AppError> {
        Ok(())
    }
}
