use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::navigation::{RouteNode, declared_permissions};
use crate::store::RbacStore;

/// Result of one permission sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub created: usize,
    pub existing: usize,
    pub total: usize,
}

/// Create a permission for every `(action, subject)` declared in the route tree.
///
/// Existing permissions are left untouched, so running this repeatedly is safe.
/// Permissions no longer declared anywhere are not removed.
pub async fn sync_permissions(store: &dyn RbacStore, tree: &RouteNode) -> Result<SyncReport, AppError> {
    let mut report = SyncReport::default();
    for key in declared_permissions(tree) {
        let (_, created) = store.upsert_permission(&key, &key.describe()).await?;
        if created {
            report.created += 1;
        } else {
            report.existing += 1;
        }
    }
    report.total = store.list_permissions().await?.len();

    log::info!(
        "Permission sync: created={}, existing={}, total={}",
        report.created,
        report.existing,
        report.total
    );
    Ok(report)
}
