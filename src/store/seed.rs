use crate::errors::AppError;
use crate::models::NewRole;
use crate::navigation::RouteNode;
use crate::store::RbacStore;
use crate::sync::sync_permissions;

pub const ADMIN_ROLE: &str = "admin";

/// Sync permissions from the routes and make sure the `admin` system role exists.
///
/// A freshly created admin role gets every permission. An existing one is left
/// alone so that edits made through the UI survive restarts.
pub async fn seed_defaults(store: &dyn RbacStore, tree: &RouteNode) -> Result<(), AppError> {
    sync_permissions(store, tree).await?;

    if store.find_role_by_name(ADMIN_ROLE).await?.is_some() {
        log::info!("Role '{ADMIN_ROLE}' already present, skipping seed");
        return Ok(());
    }

    let permission_ids = store
        .list_permissions()
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    let admin = NewRole {
        name: ADMIN_ROLE.to_string(),
        description: "Acceso completo a la administración".to_string(),
        permission_ids,
    };
    let role = store.create_role(&admin, true).await?;
    log::info!(
        "Seeded system role '{}' with {} permissions",
        role.name,
        role.permissions.len()
    );
    Ok(())
}
