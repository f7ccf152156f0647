use std::fmt;

use serde::Serialize;

pub const NAV_KEY_SEPARATOR: &str = "::";

/// Identifies one sidebar destination as `"section::label"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NavKey(String);

impl NavKey {
    pub fn new(section: &str, label: &str) -> Self {
        NavKey(format!("{section}{NAV_KEY_SEPARATOR}{label}"))
    }

    /// Recover `(section, label)`. Exact only when the section has no `"::"` of its own.
    pub fn split(&self) -> Option<(&str, &str)> {
        self.0.split_once(NAV_KEY_SEPARATOR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NavKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn get_nav_key(section: &str, label: &str) -> NavKey {
    NavKey::new(section, label)
}
