//! Client side of role administration: the calls the admin console makes and
//! the optimistic cache it renders from.

pub mod api;
pub mod cache;
pub mod toggle;

pub use api::{HttpRoleApi, RoleApi};
pub use cache::{CachedRole, RoleCache, RolePermissionEntry, RoleSnapshot};
pub use toggle::{
    MutationOutcome, PERMISSION_UPDATE_ERROR, PermissionToggler, toggle_bulk_ids,
    toggle_single_ids,
};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },
}
