//! Local cache of the role list, as the admin console sees it.
//!
//! Writes here are optimistic: they are applied before the server confirms
//! them, and the whole list is refetched once the mutation settles. Between
//! the two, readers may see an entry that the server will still overwrite.

use std::collections::BTreeSet;

use tokio::sync::Mutex;

use crate::models::{Permission, Role};

/// One grant as displayed: confirmed by the server, or written locally and
/// still waiting for confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum RolePermissionEntry {
    Confirmed(Permission),
    PendingId(i64),
}

impl RolePermissionEntry {
    pub fn permission_id(&self) -> i64 {
        match self {
            RolePermissionEntry::Confirmed(p) => p.id,
            RolePermissionEntry::PendingId(id) => *id,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RolePermissionEntry::PendingId(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedRole {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_system: bool,
    pub permissions: Vec<RolePermissionEntry>,
}

impl CachedRole {
    pub fn permission_ids(&self) -> BTreeSet<i64> {
        self.permissions.iter().map(|e| e.permission_id()).collect()
    }

    pub fn has_pending(&self) -> bool {
        self.permissions.iter().any(|e| e.is_pending())
    }
}

impl From<Role> for CachedRole {
    fn from(role: Role) -> Self {
        CachedRole {
            id: role.id,
            name: role.name,
            description: role.description,
            is_system: role.is_system,
            permissions: role
                .permissions
                .into_iter()
                .map(|rp| RolePermissionEntry::Confirmed(rp.permission))
                .collect(),
        }
    }
}

/// What a rollback restores: the role list as it was before a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSnapshot(Option<Vec<CachedRole>>);

#[derive(Debug, Default)]
struct CacheState {
    roles: Option<Vec<CachedRole>>,
    stale: bool,
}

/// The lock is only held for synchronous reads and writes, never across a
/// server call, so concurrent mutations interleave freely.
#[derive(Debug, Default)]
pub struct RoleCache {
    state: Mutex<CacheState>,
}

impl RoleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached roles, or `None` before the first fetch.
    pub async fn roles(&self) -> Option<Vec<CachedRole>> {
        self.state.lock().await.roles.clone()
    }

    pub async fn role(&self, role_id: i64) -> Option<CachedRole> {
        let state = self.state.lock().await;
        state
            .roles
            .as_ref()
            .and_then(|roles| roles.iter().find(|r| r.id == role_id).cloned())
    }

    /// Replace the cache with a fresh server read.
    pub async fn store(&self, roles: Vec<Role>) {
        let mut state = self.state.lock().await;
        state.roles = Some(roles.into_iter().map(CachedRole::from).collect());
        state.stale = false;
    }

    pub async fn snapshot(&self) -> RoleSnapshot {
        RoleSnapshot(self.state.lock().await.roles.clone())
    }

    pub async fn restore(&self, snapshot: RoleSnapshot) {
        self.state.lock().await.roles = snapshot.0;
    }

    /// Mark the cached list as out of date; the next fetch replaces it.
    pub async fn invalidate(&self) {
        self.state.lock().await.stale = true;
    }

    pub async fn is_stale(&self) -> bool {
        self.state.lock().await.stale
    }

    /// Rewrite one role's grants to exactly `permission_ids`.
    ///
    /// Ids the role already had keep their confirmed entry; new ids are
    /// recorded as pending. Does nothing if the role is not cached.
    pub async fn apply_optimistic(&self, role_id: i64, permission_ids: &[i64]) {
        let mut state = self.state.lock().await;
        let Some(role) = state
            .roles
            .as_mut()
            .and_then(|roles| roles.iter_mut().find(|r| r.id == role_id))
        else {
            return;
        };

        let mut previous = std::mem::take(&mut role.permissions);
        role.permissions = permission_ids
            .iter()
            .map(|id| {
                match previous.iter().position(|e| e.permission_id() == *id) {
                    Some(idx) => previous.swap_remove(idx),
                    None => RolePermissionEntry::PendingId(*id),
                }
            })
            .collect();
    }
}
