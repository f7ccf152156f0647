use serde::{Deserialize, Serialize};

/// A grantable `(action, subject)` pair. Created by the sync process, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: i64,
    pub action: String,
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

impl Permission {
    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(&self.action, &self.subject)
    }
}

/// The natural key of a permission, as declared on a route before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionKey {
    pub action: String,
    pub subject: String,
}

impl PermissionKey {
    pub fn new(action: &str, subject: &str) -> Self {
        PermissionKey {
            action: action.to_string(),
            subject: subject.to_string(),
        }
    }

    /// Default description stored for synced permissions, e.g. `"read Patient"`.
    pub fn describe(&self) -> String {
        format!("{} {}", self.action, self.subject)
    }
}
