use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::mapper::SubjectNavMap;
use super::nav_key::NavKey;
use crate::models::Permission;
use crate::navigation::{NavItem, NavSection};

pub const SYSTEM_SECTION_TITLE: &str = "Otros Permisos de Sistema";
pub const SYSTEM_ITEM_ICON: &str = "Settings";

/// One row of the role x permission grid: a sidebar destination and the
/// permissions that gate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixItem {
    pub label: String,
    pub icon: String,
    /// Deduplicated, ordered by subject.
    pub permission_ids: Vec<i64>,
    pub related_permissions: Vec<Permission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixSection {
    pub title: String,
    pub items: Vec<MatrixItem>,
    /// All ids of the section's items, for section-wide bulk toggles.
    pub permission_ids: Vec<i64>,
}

impl MatrixSection {
    fn new(title: &str, items: Vec<MatrixItem>) -> Self {
        let permission_ids = items
            .iter()
            .flat_map(|item| item.permission_ids.iter().copied())
            .collect();
        MatrixSection {
            title: title.to_string(),
            items,
            permission_ids,
        }
    }

    pub fn is_system(&self) -> bool {
        self.title == SYSTEM_SECTION_TITLE
    }
}

type SubjectIndex<'a> = HashMap<String, Vec<&'a Permission>>;
type NavSubjects = HashMap<NavKey, BTreeSet<String>>;

/// Lay the catalog out along the sidebar.
///
/// Every catalog permission lands in exactly one item: the first sidebar item
/// that claims its subject, or otherwise a per-subject item of the synthetic
/// system section. Items and sections left with nothing to toggle are dropped.
pub fn build_matrix_sections(
    sections: &[NavSection],
    catalog: &[Permission],
    subject_map: &SubjectNavMap,
) -> Vec<MatrixSection> {
    let by_subject = index_by_subject(catalog);
    let by_nav_key = invert(subject_map);

    let (mut built, used) = sections.iter().fold(
        (Vec::new(), BTreeSet::new()),
        |(mut built, used), section| {
            let (matrix_section, used) = build_section(section, &by_subject, &by_nav_key, used);
            built.extend(matrix_section);
            (built, used)
        },
    );

    built.extend(system_section(catalog, &used));
    built
}

fn index_by_subject(catalog: &[Permission]) -> SubjectIndex<'_> {
    let mut index: SubjectIndex<'_> = HashMap::new();
    for permission in catalog {
        index
            .entry(permission.subject.to_lowercase())
            .or_default()
            .push(permission);
    }
    index
}

fn invert(subject_map: &SubjectNavMap) -> NavSubjects {
    let mut inverted: NavSubjects = HashMap::new();
    for (subject, nav_keys) in subject_map {
        for nav_key in nav_keys {
            inverted
                .entry(nav_key.clone())
                .or_default()
                .insert(subject.clone());
        }
    }
    inverted
}

/// Build one section, threading the set of already placed permission ids.
fn build_section(
    section: &NavSection,
    by_subject: &SubjectIndex<'_>,
    by_nav_key: &NavSubjects,
    mut used: BTreeSet<i64>,
) -> (Option<MatrixSection>, BTreeSet<i64>) {
    let mut items = Vec::new();
    for nav_item in &section.items {
        let nav_key = NavKey::new(&section.title, &nav_item.label);
        let (item, now_used) = build_item(nav_item, &nav_key, by_subject, by_nav_key, used);
        used = now_used;
        items.extend(item);
    }

    if items.is_empty() {
        (None, used)
    } else {
        (Some(MatrixSection::new(&section.title, items)), used)
    }
}

fn build_item(
    nav_item: &NavItem,
    nav_key: &NavKey,
    by_subject: &SubjectIndex<'_>,
    by_nav_key: &NavSubjects,
    mut used: BTreeSet<i64>,
) -> (Option<MatrixItem>, BTreeSet<i64>) {
    let mut subjects: BTreeSet<String> = by_nav_key.get(nav_key).cloned().unwrap_or_default();
    if let Some(required) = &nav_item.required_permission {
        subjects.insert(required.subject.to_lowercase());
    }

    let mut permissions: Vec<&Permission> = subjects
        .iter()
        .filter_map(|subject| by_subject.get(subject))
        .flatten()
        .copied()
        .filter(|p| !used.contains(&p.id))
        .collect();
    permissions.sort_by(|a, b| by_subject_name(a, b));
    let mut seen = BTreeSet::new();
    permissions.retain(|p| seen.insert(p.id));

    if permissions.is_empty() {
        return (None, used);
    }

    used.extend(permissions.iter().map(|p| p.id));
    let item = MatrixItem {
        label: nav_item.label.clone(),
        icon: nav_item.icon.clone(),
        permission_ids: permissions.iter().map(|p| p.id).collect(),
        related_permissions: permissions.into_iter().cloned().collect(),
    };
    (Some(item), used)
}

/// Unplaced permissions, one item per subject.
fn system_section(catalog: &[Permission], used: &BTreeSet<i64>) -> Option<MatrixSection> {
    let mut groups: BTreeMap<&str, Vec<&Permission>> = BTreeMap::new();
    let mut seen = BTreeSet::new();
    for permission in catalog {
        if used.contains(&permission.id) || !seen.insert(permission.id) {
            continue;
        }
        groups.entry(permission.subject.as_str()).or_default().push(permission);
    }
    if groups.is_empty() {
        return None;
    }

    let items = groups
        .into_iter()
        .map(|(subject, mut permissions)| {
            permissions.sort_by(|a, b| by_subject_name(a, b));
            MatrixItem {
                label: format!("{subject} (Sistema)"),
                icon: SYSTEM_ITEM_ICON.to_string(),
                permission_ids: permissions.iter().map(|p| p.id).collect(),
                related_permissions: permissions.into_iter().cloned().collect(),
            }
        })
        .collect();
    Some(MatrixSection::new(SYSTEM_SECTION_TITLE, items))
}

/// Case-insensitive subject order, then action and id so output is stable.
fn by_subject_name(a: &Permission, b: &Permission) -> Ordering {
    a.subject
        .to_lowercase()
        .cmp(&b.subject.to_lowercase())
        .then_with(|| a.subject.cmp(&b.subject))
        .then_with(|| a.action.cmp(&b.action))
        .then_with(|| a.id.cmp(&b.id))
}
