//! Shared test infrastructure for integration tests.
//!
//! Everything runs against `MemoryRbacStore`, so no database is needed.
//!
//! - `permission()` / `catalog()` - hand-built permission rows for matrix tests
//! - `seeded_state()` - app state with the clinic routes synced into the store
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;

use clinic_rbac::handlers::AppState;
use clinic_rbac::matrix::AliasScoring;
use clinic_rbac::models::Permission;
use clinic_rbac::navigation::{clinic_nav_sections, clinic_route_tree};
use clinic_rbac::store::{MemoryRbacStore, RbacStore};
use clinic_rbac::sync::sync_permissions;

// ============================================================================
// PERMISSION CATALOGS
// ============================================================================

pub fn permission(id: i64, action: &str, subject: &str) -> Permission {
    Permission {
        id,
        action: action.to_string(),
        subject: subject.to_string(),
        description: format!("{action} {subject}"),
    }
}

/// Catalog with ids assigned in order, starting at 1.
pub fn catalog(entries: &[(&str, &str)]) -> Vec<Permission> {
    entries
        .iter()
        .enumerate()
        .map(|(i, (action, subject))| permission(i as i64 + 1, action, subject))
        .collect()
}

// ============================================================================
// APP STATE
// ============================================================================

/// Empty store, clinic routes and sidebar.
pub fn empty_state() -> web::Data<AppState> {
    web::Data::new(AppState {
        store: Arc::new(MemoryRbacStore::new()),
        route_tree: clinic_route_tree(),
        nav_sections: clinic_nav_sections(),
        alias_scoring: AliasScoring::default(),
    })
}

/// Clinic routes with their permissions already synced into the store.
pub async fn seeded_state() -> web::Data<AppState> {
    let state = empty_state();
    sync_permissions(state.store.as_ref(), &state.route_tree)
        .await
        .expect("Failed to sync permissions");
    state
}

pub async fn permission_id(store: &dyn RbacStore, action: &str, subject: &str) -> i64 {
    store
        .list_permissions()
        .await
        .expect("list permissions")
        .into_iter()
        .find(|p| p.action == action && p.subject == subject)
        .map(|p| p.id)
        .unwrap_or_else(|| panic!("no permission {action} {subject}"))
}
