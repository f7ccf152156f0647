//! Declared application routes and the metadata attached to them.
//!
//! The route tree is the single place where a page says which sidebar entry it
//! belongs to (`nav`) and which permission gates it (`permission`). Both the
//! permission sync and the permission matrix read it.
//!
//! `children` comes in two shapes: a list, or an object keyed by route id.
//! Entries that are not route objects are skipped one by one, so a bad entry
//! never hides its siblings. Any other `children` value is kept as-is and
//! treated as "no children".

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::PermissionKey;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub static_data: StaticData,
    #[serde(default)]
    pub children: RouteChildren,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<NavMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<PermissionMeta>,
}

/// The sidebar entry a route (and, by inheritance, its descendants) belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavMeta {
    pub section: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMeta {
    #[serde(default = "default_action")]
    pub action: String,
    pub subject: String,
}

fn default_action() -> String {
    "read".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouteChildren {
    #[default]
    None,
    List(Vec<RouteNode>),
    Keyed(BTreeMap<String, RouteNode>),
    Malformed(Value),
}

impl<'de> Deserialize<'de> for RouteChildren {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => RouteChildren::None,
            Value::Array(entries) => {
                RouteChildren::List(entries.into_iter().filter_map(child_node).collect())
            }
            Value::Object(entries) => RouteChildren::Keyed(
                entries
                    .into_iter()
                    .filter_map(|(key, value)| child_node(value).map(|node| (key, node)))
                    .collect(),
            ),
            other => RouteChildren::Malformed(other),
        })
    }
}

fn child_node(value: Value) -> Option<RouteNode> {
    match RouteNode::deserialize(value) {
        Ok(node) => Some(node),
        Err(e) => {
            log::debug!("Skipping malformed route child: {e}");
            None
        }
    }
}

impl RouteChildren {
    /// Child nodes: list order for lists, key order (sorted) for keyed children.
    pub fn nodes(&self) -> Vec<&RouteNode> {
        match self {
            RouteChildren::List(nodes) => nodes.iter().collect(),
            RouteChildren::Keyed(nodes) => nodes.values().collect(),
            RouteChildren::None | RouteChildren::Malformed(_) => Vec::new(),
        }
    }
}

impl RouteNode {
    pub fn new(path: &str) -> Self {
        RouteNode {
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn nav(mut self, section: &str, label: &str) -> Self {
        self.static_data.nav = Some(NavMeta {
            section: section.to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn permission(mut self, action: &str, subject: &str) -> Self {
        self.static_data.permission = Some(PermissionMeta {
            action: action.to_string(),
            subject: subject.to_string(),
        });
        self
    }

    pub fn children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = RouteChildren::List(children);
        self
    }
}

/// Every `(action, subject)` pair declared anywhere in the tree, with or without nav.
pub fn declared_permissions(tree: &RouteNode) -> BTreeSet<PermissionKey> {
    let mut found = BTreeSet::new();
    collect_permissions(tree, &mut found);
    found
}

fn collect_permissions(node: &RouteNode, found: &mut BTreeSet<PermissionKey>) {
    if let Some(perm) = &node.static_data.permission {
        if !perm.subject.trim().is_empty() {
            found.insert(PermissionKey::new(perm.action.trim(), perm.subject.trim()));
        }
    }
    for child in node.children.nodes() {
        collect_permissions(child, found);
    }
}

pub fn parse_route_tree(json: &str) -> Result<RouteNode, AppError> {
    serde_json::from_str(json).map_err(|e| AppError::RouteTree(e.to_string()))
}

pub fn load_route_tree(path: &Path) -> Result<RouteNode, AppError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| AppError::RouteTree(format!("{}: {e}", path.display())))?;
    parse_route_tree(&json)
}
