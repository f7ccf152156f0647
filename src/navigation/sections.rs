use serde::{Deserialize, Serialize};

/// A sidebar destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub label: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<RequiredPermission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredPermission {
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSection {
    pub title: String,
    pub items: Vec<NavItem>,
}

impl NavItem {
    pub fn new(label: &str, icon: &str) -> Self {
        NavItem {
            label: label.to_string(),
            icon: icon.to_string(),
            required_permission: None,
        }
    }

    pub fn requires(mut self, subject: &str) -> Self {
        self.required_permission = Some(RequiredPermission {
            subject: subject.to_string(),
        });
        self
    }
}

impl NavSection {
    pub fn new(title: &str, items: Vec<NavItem>) -> Self {
        NavSection {
            title: title.to_string(),
            items,
        }
    }
}
