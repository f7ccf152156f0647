//! Role x permission matrix derived from the route tree and the sidebar.
//!
//! route tree -> [`mapper`] -> [`alias`] -> [`builder`] -> [`PermissionMatrix`]

pub mod alias;
pub mod builder;
pub mod mapper;
pub mod nav_key;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use alias::{AliasMatch, AliasScoring, best_alias, infer_aliases, tokenize};
pub use builder::{MatrixItem, MatrixSection, SYSTEM_SECTION_TITLE, build_matrix_sections};
pub use mapper::{SubjectNavMap, map_subjects_to_nav};
pub use nav_key::{NAV_KEY_SEPARATOR, NavKey, get_nav_key};

use crate::models::Permission;
use crate::navigation::{NavSection, RouteNode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionMatrix {
    pub sections: Vec<MatrixSection>,
    /// Subjects that reached no sidebar item and ended up in the system section.
    pub unmapped_subjects: Vec<String>,
}

impl PermissionMatrix {
    pub fn build(
        route_tree: &RouteNode,
        nav_sections: &[NavSection],
        catalog: &[Permission],
        scoring: &AliasScoring,
    ) -> Self {
        let mut subject_map = map_subjects_to_nav(route_tree);
        let aliases = infer_aliases(&mut subject_map, catalog, scoring);
        let sections = build_matrix_sections(nav_sections, catalog, &subject_map);

        let unmapped_subjects: Vec<String> = sections
            .iter()
            .filter(|s| s.is_system())
            .flat_map(|s| s.items.iter())
            .flat_map(|item| item.related_permissions.iter())
            .map(|p| p.subject.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if !unmapped_subjects.is_empty() {
            log::warn!(
                "Permission matrix: {} subject(s) without navigation: {}",
                unmapped_subjects.len(),
                unmapped_subjects.join(", ")
            );
        }
        log::debug!(
            "Permission matrix built: {} sections, {} aliases",
            sections.len(),
            aliases.len()
        );

        PermissionMatrix {
            sections,
            unmapped_subjects,
        }
    }

    /// Every permission id in the matrix, in display order.
    pub fn permission_ids(&self) -> Vec<i64> {
        self.sections
            .iter()
            .flat_map(|s| s.permission_ids.iter().copied())
            .collect()
    }

    pub fn find_item(&self, label: &str) -> Option<&MatrixItem> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .find(|item| item.label == label)
    }
}
