//! Routes and sidebar of the clinic administration app.
//!
//! Section titles and item labels here must match the `nav` annotations on the
//! routes, since the permission matrix joins the two on `section::label`.

use super::routes::RouteNode;
use super::sections::{NavItem, NavSection};

pub const SECTION_GENERAL: &str = "General";
pub const SECTION_CLINICAL: &str = "Clínica";
pub const SECTION_STAFF: &str = "Personal";
pub const SECTION_FINANCE: &str = "Finanzas";
pub const SECTION_ADMIN: &str = "Administración";

pub fn clinic_nav_sections() -> Vec<NavSection> {
    vec![
        NavSection::new(
            SECTION_GENERAL,
            vec![NavItem::new("Panel", "LayoutDashboard").requires("Dashboard")],
        ),
        NavSection::new(
            SECTION_CLINICAL,
            vec![
                NavItem::new("Pacientes", "Users").requires("Patient"),
                NavItem::new("Consultas", "Stethoscope").requires("Consultation"),
            ],
        ),
        NavSection::new(
            SECTION_STAFF,
            vec![
                NavItem::new("Horarios", "Clock").requires("Timesheet"),
                NavItem::new("Colaboradores", "IdCard").requires("Employee"),
            ],
        ),
        NavSection::new(
            SECTION_FINANCE,
            vec![
                NavItem::new("Balance diario", "Wallet").requires("DailyBalance"),
                NavItem::new("Contrapartes", "Building2").requires("Counterpart"),
                NavItem::new("Estadísticas de facturación", "BarChart3"),
            ],
        ),
        NavSection::new(
            SECTION_ADMIN,
            vec![
                NavItem::new("Roles y permisos", "Shield").requires("Role"),
                NavItem::new("Usuarios", "UserCog").requires("User"),
            ],
        ),
    ]
}

pub fn clinic_route_tree() -> RouteNode {
    RouteNode::new("/").children(vec![
        RouteNode::new("/")
            .nav(SECTION_GENERAL, "Panel")
            .permission("read", "Dashboard"),
        RouteNode::new("/patients")
            .nav(SECTION_CLINICAL, "Pacientes")
            .permission("read", "Patient")
            .children(vec![
                RouteNode::new("/patients/new").permission("create", "Patient"),
                RouteNode::new("/patients/$id")
                    .permission("update", "Patient")
                    .children(vec![
                        RouteNode::new("/patients/$id/delete").permission("delete", "Patient"),
                        RouteNode::new("/patients/$id/records").permission("read", "ClinicalRecord"),
                    ]),
            ]),
        RouteNode::new("/consultations")
            .nav(SECTION_CLINICAL, "Consultas")
            .permission("read", "Consultation")
            .children(vec![
                RouteNode::new("/consultations/new").permission("create", "Consultation"),
            ]),
        RouteNode::new("/timesheets")
            .nav(SECTION_STAFF, "Horarios")
            .permission("read", "Timesheet")
            .children(vec![
                RouteNode::new("/timesheets/new").permission("create", "Timesheet"),
                RouteNode::new("/timesheets/$id").permission("update", "Timesheet"),
            ]),
        RouteNode::new("/employees")
            .nav(SECTION_STAFF, "Colaboradores")
            .permission("read", "Employee")
            .children(vec![
                RouteNode::new("/employees/new").permission("create", "Employee"),
            ]),
        RouteNode::new("/daily-balances")
            .nav(SECTION_FINANCE, "Balance diario")
            .permission("read", "DailyBalance")
            .children(vec![
                RouteNode::new("/daily-balances/new").permission("create", "DailyBalance"),
                RouteNode::new("/daily-balances/$date").permission("update", "DailyBalance"),
            ]),
        RouteNode::new("/counterparts")
            .nav(SECTION_FINANCE, "Contrapartes")
            .permission("read", "Counterpart")
            .children(vec![
                RouteNode::new("/counterparts/new").permission("create", "Counterpart"),
                RouteNode::new("/counterparts/$id").permission("update", "Counterpart"),
            ]),
        RouteNode::new("/invoicing-stats")
            .nav(SECTION_FINANCE, "Estadísticas de facturación")
            .permission("read", "InvoiceStatistic"),
        RouteNode::new("/settings")
            .nav(SECTION_ADMIN, "Roles y permisos")
            .children(vec![
                RouteNode::new("/settings/roles")
                    .permission("read", "Role")
                    .children(vec![
                        RouteNode::new("/settings/roles/$id").permission("update", "Role"),
                    ]),
            ]),
        RouteNode::new("/users")
            .nav(SECTION_ADMIN, "Usuarios")
            .permission("read", "User")
            .children(vec![RouteNode::new("/users/new").permission("create", "User")]),
        // Routes below carry a permission but no sidebar entry.
        RouteNode::new("/patient-payments").permission("read", "PatientPayment"),
        RouteNode::new("/patient-payments/new").permission("create", "PatientPayment"),
        RouteNode::new("/daily-balances/import").permission("create", "DailyBalanceImport"),
        RouteNode::new("/supply-requests").permission("read", "SupplyRequest"),
        RouteNode::new("/backups").permission("read", "Backup"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::routes::declared_permissions;

    #[test]
    fn every_nav_annotation_has_a_sidebar_item() {
        let sections = clinic_nav_sections();
        let mut missing = Vec::new();
        let mut stack = vec![clinic_route_tree()];
        while let Some(node) = stack.pop() {
            if let Some(nav) = &node.static_data.nav {
                let found = sections.iter().any(|s| {
                    s.title == nav.section && s.items.iter().any(|i| i.label == nav.label)
                });
                if !found {
                    missing.push(format!("{}::{}", nav.section, nav.label));
                }
            }
            stack.extend(node.children.nodes().into_iter().cloned());
        }
        assert!(missing.is_empty(), "unmatched nav annotations: {missing:?}");
    }

    #[test]
    fn clinic_tree_declares_crud_permissions() {
        let keys = declared_permissions(&clinic_route_tree());
        assert!(keys.iter().any(|k| k.action == "delete" && k.subject == "Patient"));
        assert!(keys.iter().any(|k| k.subject == "PatientPayment"));
        assert!(keys.iter().all(|k| !k.subject.is_empty()));
    }
}
