//! Router Chain
//!
//! Consults routers in order until one has an opinion:
//!
//! ```text
//! Query (model, hints)
//!        │
//!        ▼
//! Router 1 ──opinion──► decision
//!        │
//!     abstain
//!        ▼
//! Router 2 ──opinion──► decision
//!        │
//!     abstain
//!        ▼
//!    fallback (default alias / allow)
//! ```

use tracing::{debug, info, warn};

use dbshard_core::{RouterSpec, RoutingConfig};
use dbshard_types::{DbAlias, ModelMeta, DEFAULT_DB_ALIAS};

use crate::error::RouterError;
use crate::strategy::{AppRouter, DatabaseRouter, MultiAppRouter, ShardRouter};
use crate::types::{Permission, RoutingHints};

/// Which database a query goes to, and who decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    /// Target database
    pub alias: DbAlias,

    /// Router that chose the alias (None = default alias)
    pub decided_by: Option<&'static str>,
}

impl RoutingDecision {
    /// Whether no router had an opinion
    pub fn is_fallback(&self) -> bool {
        self.decided_by.is_none()
    }
}

/// Build a single router from its config entry
pub fn build_router(spec: &RouterSpec) -> Result<Box<dyn DatabaseRouter>, RouterError> {
    let router: Box<dyn DatabaseRouter> = match spec {
        RouterSpec::App(config) => Box::new(AppRouter::new(config.clone())?),
        RouterSpec::MultiApp(config) => Box::new(MultiAppRouter::new(config.clone())?),
        RouterSpec::Shard(config) => {
            if config.app_list.is_empty() {
                warn!("Shard router configured without apps, it will never route");
            }
            if config.db_name_prefix.is_none() {
                warn!("Shard router configured without db_name_prefix, no database counts as a shard");
            }
            Box::new(ShardRouter::new(config.clone()))
        }
    };
    Ok(router)
}

/// Ordered list of routers with a fallback alias
pub struct RouterChain {
    routers: Vec<Box<dyn DatabaseRouter>>,
    default_alias: DbAlias,
}

impl RouterChain {
    /// Create an empty chain falling back to `default`
    pub fn new() -> Self {
        Self::with_default_alias(DEFAULT_DB_ALIAS)
    }

    /// Create an empty chain with a custom fallback alias
    pub fn with_default_alias(default_alias: impl Into<DbAlias>) -> Self {
        Self {
            routers: Vec::new(),
            default_alias: default_alias.into(),
        }
    }

    /// Build every configured router, in order
    pub fn from_config(config: &RoutingConfig) -> Result<Self, RouterError> {
        let mut chain = Self::with_default_alias(config.default_alias.clone());
        for spec in &config.routers {
            chain.add_router(build_router(spec)?);
        }

        info!(
            routers = chain.len(),
            default_alias = %chain.default_alias,
            "Router chain ready"
        );
        Ok(chain)
    }

    /// Append a router
    pub fn with_router(mut self, router: impl DatabaseRouter + 'static) -> Self {
        self.routers.push(Box::new(router));
        self
    }

    /// Append a boxed router
    pub fn add_router(&mut self, router: Box<dyn DatabaseRouter>) {
        self.routers.push(router);
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    pub fn default_alias(&self) -> &str {
        &self.default_alias
    }

    /// Names of the routers, in order
    pub fn router_names(&self) -> Vec<&'static str> {
        self.routers.iter().map(|r| r.name()).collect()
    }

    /// Database to read `model` from
    pub fn db_for_read(&self, model: &dyn ModelMeta, hints: &RoutingHints<'_>) -> RoutingDecision {
        self.first_alias(model, |router| router.resolve_for_read(model, hints))
    }

    /// Database to write `model` to
    pub fn db_for_write(&self, model: &dyn ModelMeta, hints: &RoutingHints<'_>) -> RoutingDecision {
        self.first_alias(model, |router| router.resolve_for_write(model, hints))
    }

    /// First decided verdict on a relation, or `Abstain`
    pub fn allow_relation(&self, a: &dyn ModelMeta, b: &dyn ModelMeta) -> Permission {
        self.first_permission(|router| router.allow_relation(a, b))
            .unwrap_or(Permission::Abstain)
    }

    /// First decided verdict on a migration, or `Abstain`
    ///
    /// Hosts treat `Abstain` as allowed, see [`Permission::allowed_by_default`].
    pub fn allow_schema_migration(&self, db: &str, model: &dyn ModelMeta) -> Permission {
        self.first_permission(|router| router.allow_schema_migration(db, model))
            .unwrap_or(Permission::Abstain)
    }

    fn first_alias<F>(&self, model: &dyn ModelMeta, query: F) -> RoutingDecision
    where
        F: Fn(&dyn DatabaseRouter) -> Option<DbAlias>,
    {
        for router in &self.routers {
            if let Some(alias) = query(router.as_ref()) {
                debug!(router = router.name(), app = %model.app_label(), alias = %alias, "Router decided");
                return RoutingDecision {
                    alias,
                    decided_by: Some(router.name()),
                };
            }
        }

        RoutingDecision {
            alias: self.default_alias.clone(),
            decided_by: None,
        }
    }

    fn first_permission<F>(&self, query: F) -> Option<Permission>
    where
        F: Fn(&dyn DatabaseRouter) -> Permission,
    {
        self.routers
            .iter()
            .map(|router| query(router.as_ref()))
            .find(|permission| permission.is_decided())
    }
}

impl Default for RouterChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RouterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterChain")
            .field("routers", &self.router_names())
            .field("default_alias", &self.default_alias)
            .finish()
    }
}
