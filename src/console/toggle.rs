use std::collections::BTreeSet;
use std::sync::Arc;

use super::api::RoleApi;
use super::cache::{CachedRole, RoleCache};
use crate::models::Role;

/// Shown to the user whenever a permission update fails.
pub const PERMISSION_UPDATE_ERROR: &str = "Error al actualizar permisos";

/// Flip one permission: remove it if granted, grant it otherwise.
/// Returns the complete new set, sorted.
pub fn toggle_single_ids(current: &BTreeSet<i64>, permission_id: i64) -> Vec<i64> {
    let mut next = current.clone();
    if !next.remove(&permission_id) {
        next.insert(permission_id);
    }
    next.into_iter().collect()
}

/// Flip a group of permissions as a unit.
///
/// If every id in the group is granted, all of them are removed. Otherwise the
/// missing ones are added, so a partially granted group always turns fully on.
pub fn toggle_bulk_ids(current: &BTreeSet<i64>, permission_ids: &[i64]) -> Vec<i64> {
    let mut next = current.clone();
    let all_granted = permission_ids.iter().all(|id| current.contains(id));
    if all_granted {
        for id in permission_ids {
            next.remove(id);
        }
    } else {
        next.extend(permission_ids.iter().copied());
    }
    next.into_iter().collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The server accepted the new set and returned the stored role.
    Applied(Role),
    /// The server call failed; the cache was restored to its prior state.
    RolledBack { message: &'static str, error: String },
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied(_))
    }
}

/// Role permission mutations with optimistic cache writes.
///
/// Mutations on the same role are not serialized: if two are in flight, the
/// cache shows them in issuance order and the refetch after each settles
/// brings the cache back to whatever the server stored last.
pub struct PermissionToggler<A: RoleApi> {
    api: A,
    cache: Arc<RoleCache>,
}

impl<A: RoleApi> PermissionToggler<A> {
    pub fn new(api: A, cache: Arc<RoleCache>) -> Self {
        PermissionToggler { api, cache }
    }

    pub fn cache(&self) -> &Arc<RoleCache> {
        &self.cache
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch the role list into the cache. Failures leave the cache as it was.
    pub async fn refresh(&self) -> bool {
        match self.api.list_roles().await {
            Ok(roles) => {
                self.cache.store(roles).await;
                true
            }
            Err(e) => {
                log::warn!("Failed to refetch roles: {e}");
                false
            }
        }
    }

    pub async fn toggle_single(&self, role: &CachedRole, permission_id: i64) -> MutationOutcome {
        let next = toggle_single_ids(&role.permission_ids(), permission_id);
        self.submit(role.id, next).await
    }

    pub async fn toggle_bulk(&self, role: &CachedRole, permission_ids: &[i64]) -> MutationOutcome {
        let next = toggle_bulk_ids(&role.permission_ids(), permission_ids);
        self.submit(role.id, next).await
    }

    async fn submit(&self, role_id: i64, permission_ids: Vec<i64>) -> MutationOutcome {
        let snapshot = self.cache.snapshot().await;
        self.cache.apply_optimistic(role_id, &permission_ids).await;

        let outcome = match self.api.update_role_permissions(role_id, &permission_ids).await {
            Ok(role) => MutationOutcome::Applied(role),
            Err(e) => {
                log::warn!("Permission update for role {role_id} failed, rolling back: {e}");
                self.cache.restore(snapshot).await;
                MutationOutcome::RolledBack {
                    message: PERMISSION_UPDATE_ERROR,
                    error: e.to_string(),
                }
            }
        };

        self.cache.invalidate().await;
        self.refresh().await;
        outcome
    }
}
