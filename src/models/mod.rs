pub mod permission;
pub mod role;

pub use permission::{Permission, PermissionKey};
pub use role::{NewRole, PermissionSetUpdate, Role, RolePermission, RoleUpdate};
