pub mod clinic;
pub mod routes;
pub mod sections;

pub use clinic::{clinic_nav_sections, clinic_route_tree};
pub use routes::{
    NavMeta, PermissionMeta, RouteChildren, RouteNode, StaticData, declared_permissions,
    load_route_tree, parse_route_tree,
};
pub use sections::{NavItem, NavSection, RequiredPermission};
