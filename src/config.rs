use std::path::PathBuf;

use crate::matrix::AliasScoring;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must be true or false, got {value:?}")]
    InvalidBool { key: &'static str, value: String },
}

/// Runtime configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres URL. `None` runs the server on the in-memory store.
    pub database_url: Option<String>,
    pub bind_addr: String,
    /// JSON route tree that replaces the built-in clinic routes.
    pub route_tree_path: Option<PathBuf>,
    pub alias_scoring: AliasScoring,
    /// Sync permissions from the route tree and create the admin role at startup.
    pub seed_defaults: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: None,
            bind_addr: "127.0.0.1:8080".to_string(),
            route_tree_path: None,
            alias_scoring: AliasScoring::default(),
            seed_defaults: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine; real deployments set variables directly.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset and empty values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();

        let mut alias_scoring = defaults.alias_scoring;
        if let Some(v) = get("ALIAS_MIN_SCORE") {
            alias_scoring.min_score = parse_number("ALIAS_MIN_SCORE", &v)?;
        }
        if let Some(v) = get("ALIAS_PARTIAL_MIN_LEN") {
            alias_scoring.partial_min_len = parse_number("ALIAS_PARTIAL_MIN_LEN", &v)?;
        }

        let seed_defaults = match get("SEED_DEFAULTS") {
            Some(v) => parse_bool("SEED_DEFAULTS", &v)?,
            None => defaults.seed_defaults,
        };

        Ok(AppConfig {
            database_url: get("DATABASE_URL"),
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            route_tree_path: get("ROUTE_TREE_PATH").map(PathBuf::from),
            alias_scoring,
            seed_defaults,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value: value.to_string() })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { key, value: value.to_string() }),
    }
}
