//! Shard Group Router
//!
//! Routes a group of applications to the shard each instance lives in.
//! The alias is never fixed: it comes from the instance passed as a hint.
//!
//! Shard databases share a naming prefix (`shard_001`, `shard_002`, ...);
//! the prefix decides which databases the group may migrate.

use tracing::trace;

use dbshard_core::ShardRouterConfig;
use dbshard_types::{is_bootstrap_app, DbAlias, ModelMeta};

use crate::types::{Permission, RoutingHints};
use super::{relation_permission, DatabaseRouter};

/// Routes a group of applications across shard databases
///
/// Unlike the app routers, construction performs no validation: an empty
/// group routes nothing, and without a prefix no database is a shard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardRouter {
    app_list: Vec<String>,
    db_name_prefix: Option<String>,
}

impl ShardRouter {
    /// Create a router from its group settings
    pub fn new(config: ShardRouterConfig) -> Self {
        Self {
            app_list: config.app_list,
            db_name_prefix: config.db_name_prefix,
        }
    }

    pub fn app_list(&self) -> &[String] {
        &self.app_list
    }

    pub fn db_name_prefix(&self) -> Option<&str> {
        self.db_name_prefix.as_deref()
    }

    fn owns(&self, model: &dyn ModelMeta) -> bool {
        self.app_list.iter().any(|app| app == model.app_label())
    }

    fn is_shard_db(&self, db: &str) -> bool {
        self.db_name_prefix
            .as_deref()
            .is_some_and(|prefix| db.starts_with(prefix))
    }

    fn resolve(&self, model: &dyn ModelMeta, hints: &RoutingHints<'_>) -> Option<DbAlias> {
        if !self.owns(model) {
            return None;
        }

        // Without the instance we cannot tell which shard, so no opinion
        let shard = hints.instance.map(|instance| instance.resolve_shard());
        trace!(app = %model.app_label(), shard = ?shard, "Routed by instance shard");
        shard
    }
}

impl DatabaseRouter for ShardRouter {
    fn resolve_for_read(&self, model: &dyn ModelMeta, hints: &RoutingHints<'_>) -> Option<DbAlias> {
        self.resolve(model, hints)
    }

    fn resolve_for_write(&self, model: &dyn ModelMeta, hints: &RoutingHints<'_>) -> Option<DbAlias> {
        self.resolve(model, hints)
    }

    fn allow_relation(&self, a: &dyn ModelMeta, b: &dyn ModelMeta) -> Permission {
        relation_permission(self.owns(a), self.owns(b))
    }

    fn allow_schema_migration(&self, db: &str, model: &dyn ModelMeta) -> Permission {
        if is_bootstrap_app(model.app_label()) {
            return Permission::Allow;
        }

        let in_group = self.owns(model);
        let shard_db = self.is_shard_db(db);

        if in_group {
            return Permission::from_membership(shard_db);
        }
        if shard_db {
            // Shard databases hold the group's apps and nothing else
            return Permission::Deny;
        }
        Permission::Abstain
    }

    fn name(&self) -> &'static str {
        "Shard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support::{model, Pinned};

    fn router() -> ShardRouter {
        ShardRouter::new(ShardRouterConfig::new(["messages", "inbox"], "shard_"))
    }

    #[test]
    fn test_resolve_requires_instance_hint() {
        let router = router();
        let messages = model("messages");

        assert_eq!(router.resolve_for_read(&messages, &RoutingHints::none()), None);
        assert_eq!(router.resolve_for_write(&messages, &RoutingHints::none()), None);
    }

    #[test]
    fn test_resolve_uses_instance_shard() {
        let router = router();
        let instance = Pinned("shard_002");
        let hints = RoutingHints::with_instance(&instance);

        assert_eq!(router.resolve_for_read(&model("messages"), &hints).as_deref(), Some("shard_002"));
        assert_eq!(router.resolve_for_write(&model("inbox"), &hints).as_deref(), Some("shard_002"));
    }

    #[test]
    fn test_resolve_ignores_other_apps() {
        let router = router();
        let instance = Pinned("shard_002");
        let hints = RoutingHints::with_instance(&instance);

        assert_eq!(router.resolve_for_read(&model("billing"), &hints), None);
        assert_eq!(router.resolve_for_write(&model("billing"), &hints), None);
    }

    #[test]
    fn test_allow_relation() {
        let router = router();

        assert_eq!(router.allow_relation(&model("messages"), &model("inbox")), Permission::Allow);
        assert_eq!(router.allow_relation(&model("messages"), &model("billing")), Permission::Deny);
        assert_eq!(router.allow_relation(&model("billing"), &model("users")), Permission::Abstain);
    }

    #[test]
    fn test_allow_schema_migration() {
        let router = router();
        let member = model("messages");
        let outsider = model("billing");

        assert_eq!(router.allow_schema_migration("shard_002", &member), Permission::Allow);
        assert_eq!(router.allow_schema_migration("other_db", &member), Permission::Deny);
        assert_eq!(router.allow_schema_migration("shard_002", &outsider), Permission::Deny);
        assert_eq!(router.allow_schema_migration("other_db", &outsider), Permission::Abstain);
    }

    #[test]
    fn test_bootstrap_app_on_any_db() {
        let router = router();
        let south = model("south");

        assert_eq!(router.allow_schema_migration("shard_001", &south), Permission::Allow);
        assert_eq!(router.allow_schema_migration("other_db", &south), Permission::Allow);
    }

    #[test]
    fn test_unconfigured_router_has_no_opinion() {
        let router = ShardRouter::default();
        let instance = Pinned("shard_001");

        assert_eq!(
            router.resolve_for_read(&model("messages"), &RoutingHints::with_instance(&instance)),
            None
        );
        assert_eq!(router.allow_schema_migration("shard_001", &model("messages")), Permission::Abstain);
        assert_eq!(router.db_name_prefix(), None);
    }
}
