//! Configuration module for dbshard routers
//!
//! A routing configuration is a JSON document listing the configured
//! databases and the routers to consult, in order:
//!
//! ```json
//! {
//!   "default_alias": "default",
//!   "databases": {
//!     "default":   { "engine": "django.db.backends.sqlite3", "name": ":memory:" },
//!     "shard_001": { "engine": "postgresql", "name": "shard_001" }
//!   },
//!   "routers": [
//!     { "kind": "app", "app_name": "billing", "db_name": "feature_A" },
//!     { "kind": "multi_app", "app_list": ["users", "auth"], "db_name": "feature_B" },
//!     { "kind": "shard", "app_list": ["messages"], "db_name_prefix": "shard_" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use dbshard_types::{DbAlias, DbEngine, DEFAULT_DB_ALIAS};

/// Environment variable naming the JSON configuration file
pub const CONFIG_PATH_ENV: &str = "DBSHARD_CONFIG";

/// Environment variable overriding the default database alias
pub const DEFAULT_DB_ENV: &str = "DBSHARD_DEFAULT_DB";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config document is not valid
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Required environment variable is not set
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),
}

/// Application list of a multi-app router.
///
/// A bare string is kept as-is so the router can reject it; it is never
/// treated as a one-element list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppList {
    Sequence(Vec<String>),
    Bare(String),
}

impl AppList {
    /// True for an empty list or an empty string
    pub fn is_empty(&self) -> bool {
        match self {
            AppList::Sequence(apps) => apps.is_empty(),
            AppList::Bare(app) => app.is_empty(),
        }
    }
}

impl From<Vec<String>> for AppList {
    fn from(apps: Vec<String>) -> Self {
        AppList::Sequence(apps)
    }
}

impl From<Vec<&str>> for AppList {
    fn from(apps: Vec<&str>) -> Self {
        AppList::Sequence(apps.into_iter().map(str::to_string).collect())
    }
}

/// Single-application router settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRouterConfig {
    /// Application routed by this router
    pub app_name: Option<String>,

    /// Database the application lives in
    pub db_name: Option<String>,
}

impl AppRouterConfig {
    pub fn new(app_name: impl Into<String>, db_name: impl Into<String>) -> Self {
        Self {
            app_name: Some(app_name.into()),
            db_name: Some(db_name.into()),
        }
    }
}

/// Multi-application router settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiAppRouterConfig {
    /// Applications colocated on the database
    pub app_list: Option<AppList>,

    /// Database the applications live in
    pub db_name: Option<String>,
}

impl MultiAppRouterConfig {
    pub fn new(app_list: impl Into<AppList>, db_name: impl Into<String>) -> Self {
        Self {
            app_list: Some(app_list.into()),
            db_name: Some(db_name.into()),
        }
    }
}

/// Shard group router settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardRouterConfig {
    /// Applications in the shard group
    #[serde(default)]
    pub app_list: Vec<String>,

    /// Common prefix of the shard databases (e.g. `shard_`)
    #[serde(default)]
    pub db_name_prefix: Option<String>,
}

impl ShardRouterConfig {
    pub fn new<S: Into<String>>(
        app_list: impl IntoIterator<Item = S>,
        db_name_prefix: impl Into<String>,
    ) -> Self {
        Self {
            app_list: app_list.into_iter().map(Into::into).collect(),
            db_name_prefix: Some(db_name_prefix.into()),
        }
    }
}

/// One entry of the router chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouterSpec {
    App(AppRouterConfig),
    MultiApp(MultiAppRouterConfig),
    Shard(ShardRouterConfig),
}

/// A configured database connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Backend engine
    pub engine: DbEngine,

    /// Database name on the backend
    #[serde(default)]
    pub name: String,
}

/// Routing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Alias used when no router has an opinion
    #[serde(default = "default_alias")]
    pub default_alias: DbAlias,

    /// Configured databases by alias
    #[serde(default)]
    pub databases: BTreeMap<DbAlias, DatabaseConfig>,

    /// Routers, consulted in order
    #[serde(default)]
    pub routers: Vec<RouterSpec>,
}

fn default_alias() -> DbAlias {
    DEFAULT_DB_ALIAS.to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_alias: default_alias(),
            databases: BTreeMap::new(),
            routers: vec![],
        }
    }
}

impl RoutingConfig {
    /// Parse configuration from a JSON string
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: RoutingConfig = serde_json::from_str(raw)?;
        debug!(
            databases = config.databases.len(),
            routers = config.routers.len(),
            "Parsed routing config"
        );
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using the given variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(CONFIG_PATH_ENV)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingEnv(CONFIG_PATH_ENV))?;

        let mut config = Self::from_file(&path)?;

        // Default alias
        if let Some(alias) = lookup(DEFAULT_DB_ENV) {
            let alias = alias.trim();
            if !alias.is_empty() {
                config.default_alias = alias.to_string();
            }
        }

        Ok(config)
    }

    /// Configured aliases starting with `prefix`, in alias order
    pub fn aliases_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.databases
            .keys()
            .filter(|alias| alias.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    /// Engine of a configured database
    pub fn engine_for(&self, alias: &str) -> Option<&DbEngine> {
        self.databases.get(alias).map(|db| &db.engine)
    }
}
