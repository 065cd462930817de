//! Single-app Router
//!
//! Partitions all data of one application into its own database.
//! Relations between that application and any other are forbidden.

use tracing::trace;

use dbshard_core::AppRouterConfig;
use dbshard_types::{is_bootstrap_app, DbAlias, ModelMeta};

use crate::error::RouterError;
use crate::types::{Permission, RoutingHints};
use super::{relation_permission, DatabaseRouter};

/// Routes one application to one database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRouter {
    app_name: String,
    db_name: DbAlias,
}

impl AppRouter {
    /// Create a router; both `app_name` and `db_name` are required
    pub fn new(config: AppRouterConfig) -> Result<Self, RouterError> {
        let app_name = config.app_name.filter(|name| !name.is_empty());
        let db_name = config.db_name.filter(|name| !name.is_empty());

        match (app_name, db_name) {
            (Some(app_name), Some(db_name)) => Ok(Self { app_name, db_name }),
            (None, None) => Err(RouterError::invalid_config(
                "Router missing both `app_name` and `db_name`",
            )),
            (None, Some(_)) => Err(RouterError::invalid_config("Router missing `app_name`")),
            (Some(_), None) => Err(RouterError::invalid_config("Router missing `db_name`")),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    fn owns(&self, model: &dyn ModelMeta) -> bool {
        model.app_label() == self.app_name
    }

    fn resolve(&self, model: &dyn ModelMeta) -> Option<DbAlias> {
        if !self.owns(model) {
            return None;
        }
        trace!(app = %self.app_name, db = %self.db_name, "Routed by app");
        Some(self.db_name.clone())
    }
}

impl DatabaseRouter for AppRouter {
    fn resolve_for_read(&self, model: &dyn ModelMeta, _hints: &RoutingHints<'_>) -> Option<DbAlias> {
        self.resolve(model)
    }

    fn resolve_for_write(&self, model: &dyn ModelMeta, _hints: &RoutingHints<'_>) -> Option<DbAlias> {
        self.resolve(model)
    }

    fn allow_relation(&self, a: &dyn ModelMeta, b: &dyn ModelMeta) -> Permission {
        relation_permission(self.owns(a), self.owns(b))
    }

    fn allow_schema_migration(&self, db: &str, model: &dyn ModelMeta) -> Permission {
        // Only the configured database is ours to judge
        if db != self.db_name {
            return Permission::Abstain;
        }

        if is_bootstrap_app(model.app_label()) {
            return Permission::Allow;
        }

        Permission::from_membership(self.owns(model))
    }

    fn name(&self) -> &'static str {
        "App"
    }
}
