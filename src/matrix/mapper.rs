use std::collections::{BTreeMap, BTreeSet};

use super::nav_key::NavKey;
use crate::navigation::{NavMeta, RouteNode};

/// Lowercased permission subject -> every sidebar destination whose routes use it.
pub type SubjectNavMap = BTreeMap<String, BTreeSet<NavKey>>;

/// Walk the route tree and record, for each route that has both an active nav
/// context and a permission subject, `section::label` against the subject.
///
/// The nav context is inherited from the nearest ancestor that declares one and
/// replaced whenever a node declares its own. Routes with a permission but no
/// nav context anywhere above them contribute nothing.
pub fn map_subjects_to_nav(tree: &RouteNode) -> SubjectNavMap {
    let mut map = SubjectNavMap::new();
    walk(tree, None, &mut map);
    map
}

fn walk<'a>(node: &'a RouteNode, inherited: Option<&'a NavMeta>, map: &mut SubjectNavMap) {
    let active = node.static_data.nav.as_ref().or(inherited);

    if let (Some(nav), Some(permission)) = (active, node.static_data.permission.as_ref()) {
        map.entry(permission.subject.to_lowercase())
            .or_default()
            .insert(NavKey::new(&nav.section, &nav.label));
    }

    for child in node.children.nodes() {
        walk(child, active, map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::parse_route_tree;

    fn keys(map: &SubjectNavMap, subject: &str) -> Vec<String> {
        map.get(subject)
            .map(|set| set.iter().map(|k| k.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn children_inherit_nearest_nav() {
        let tree = RouteNode::new("/").children(vec![
            RouteNode::new("/patients")
                .nav("Clínica", "Pacientes")
                .children(vec![
                    RouteNode::new("/patients/new").permission("create", "Patient"),
                    RouteNode::new("/patients/$id/records")
                        .nav("Clínica", "Fichas")
                        .permission("read", "ClinicalRecord"),
                ]),
        ]);

        let map = map_subjects_to_nav(&tree);
        assert_eq!(keys(&map, "patient"), vec!["Clínica::Pacientes"]);
        assert_eq!(keys(&map, "clinicalrecord"), vec!["Clínica::Fichas"]);
    }

    #[test]
    fn subject_used_under_two_navs_maps_to_both() {
        let tree = RouteNode::new("/").children(vec![
            RouteNode::new("/a").nav("S", "A").permission("read", "Report"),
            RouteNode::new("/b").nav("S", "B").permission("read", "report"),
        ]);
        let map = map_subjects_to_nav(&tree);
        assert_eq!(keys(&map, "report"), vec!["S::A", "S::B"]);
    }

    #[test]
    fn permission_without_nav_is_not_mapped() {
        let tree = RouteNode::new("/").children(vec![
            RouteNode::new("/backups").permission("read", "Backup"),
        ]);
        assert!(map_subjects_to_nav(&tree).is_empty());
    }

    #[test]
    fn keyed_children_are_walked_and_malformed_ones_skipped() {
        let tree = parse_route_tree(
            r#"{
                "path": "/",
                "staticData": {"nav": {"section": "Finanzas", "label": "Contrapartes"}},
                "children": {
                    "list": {"path": "/counterparts", "staticData": {"permission": {"subject": "Counterpart"}}},
                    "broken": {"path": "/x", "children": 42,
                               "staticData": {"permission": {"subject": "Broken"}}}
                }
            }"#,
        )
        .unwrap();

        let map = map_subjects_to_nav(&tree);
        assert_eq!(keys(&map, "counterpart"), vec!["Finanzas::Contrapartes"]);
        // The node itself is still visited; only its children are ignored.
        assert_eq!(keys(&map, "broken"), vec!["Finanzas::Contrapartes"]);
    }
}
