pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryRbacStore;
pub use postgres::PgRbacStore;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{NewRole, Permission, PermissionKey, Role, RoleUpdate};

/// Server-side persistence for the permission catalog and roles.
///
/// Lookups of a missing role return `AppError::NotFound`; duplicate role names
/// return `AppError::Conflict`. Business rules (system-role protection, id
/// validation) live in the handlers, not here.
#[async_trait]
pub trait RbacStore: Send + Sync {
    // Permissions
    async fn list_permissions(&self) -> Result<Vec<Permission>, AppError>;
    /// Insert the permission unless `(action, subject)` exists. Returns it and whether it was created.
    async fn upsert_permission(
        &self,
        key: &PermissionKey,
        description: &str,
    ) -> Result<(Permission, bool), AppError>;

    // Roles
    async fn list_roles(&self) -> Result<Vec<Role>, AppError>;
    async fn get_role(&self, id: i64) -> Result<Role, AppError>;
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AppError>;
    async fn create_role(&self, new_role: &NewRole, is_system: bool) -> Result<Role, AppError>;
    async fn update_role(&self, id: i64, update: &RoleUpdate) -> Result<Role, AppError>;
    async fn delete_role(&self, id: i64) -> Result<(), AppError>;
    /// Replace the role's whole permission set.
    async fn set_role_permissions(&self, id: i64, permission_ids: &[i64]) -> Result<Role, AppError>;

    // Lifecycle
    async fn migrate(&self) -> Result<(), AppError>;
}
