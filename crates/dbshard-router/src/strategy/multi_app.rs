//! Multi-app Router
//!
//! Partitions data of several applications into one database, so the apps
//! in the group can keep their foreign keys to each other.

use tracing::trace;

use dbshard_core::{AppList, MultiAppRouterConfig};
use dbshard_types::{is_bootstrap_app, DbAlias, ModelMeta};

use crate::error::RouterError;
use crate::types::{Permission, RoutingHints};
use super::{relation_permission, DatabaseRouter};

/// Routes a group of applications to one database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiAppRouter {
    app_list: Vec<String>,
    db_name: DbAlias,
}

impl MultiAppRouter {
    /// Create a router; a non-empty `app_list` sequence and `db_name` are required
    pub fn new(config: MultiAppRouterConfig) -> Result<Self, RouterError> {
        let app_list = config.app_list.filter(|apps| !apps.is_empty());
        let db_name = config.db_name.filter(|name| !name.is_empty());

        let (app_list, db_name) = match (app_list, db_name) {
            (Some(app_list), Some(db_name)) => (app_list, db_name),
            (None, None) => {
                return Err(RouterError::invalid_config(
                    "Router missing both `app_list` and `db_name`",
                ))
            }
            (None, Some(_)) => return Err(RouterError::invalid_config("Router missing `app_list`")),
            (Some(_), None) => return Err(RouterError::invalid_config("Router missing `db_name`")),
        };

        match app_list {
            AppList::Sequence(app_list) => Ok(Self { app_list, db_name }),
            AppList::Bare(app) => Err(RouterError::invalid_config(format!(
                "Router `app_list` must be a list of app names, got the string {:?}",
                app
            ))),
        }
    }

    pub fn app_list(&self) -> &[String] {
        &self.app_list
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    fn owns(&self, model: &dyn ModelMeta) -> bool {
        self.app_list.iter().any(|app| app == model.app_label())
    }

    fn resolve(&self, model: &dyn ModelMeta) -> Option<DbAlias> {
        if !self.owns(model) {
            return None;
        }
        trace!(app = %model.app_label(), db = %self.db_name, "Routed by app group");
        Some(self.db_name.clone())
    }
}

impl DatabaseRouter for MultiAppRouter {
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
        // Migration bookkeeping goes everywhere, not only to our database
        if is_bootstrap_app(model.app_label()) {
            return Permission::Allow;
        }

        if db == self.db_name {
            return Permission::from_membership(self.owns(model));
        }

        Permission::Abstain
    }

    fn name(&self) -> &'static str {
        "MultiApp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support::model;

    fn router() -> MultiAppRouter {
        MultiAppRouter::new(MultiAppRouterConfig::new(vec!["foo", "bar", "baz"], "my_database"))
            .unwrap()
    }

    #[test]
    fn test_staged_validation() {
        let missing_both = MultiAppRouter::new(MultiAppRouterConfig::default()).unwrap_err();
        assert_eq!(
            missing_both.to_string(),
            "Invalid configuration: Router missing both `app_list` and `db_name`"
        );

        let missing_apps = MultiAppRouter::new(MultiAppRouterConfig {
            app_list: Some(AppList::Sequence(vec![])),
            db_name: Some("my_database".to_string()),
        })
        .unwrap_err();
        assert_eq!(
            missing_apps,
            RouterError::InvalidConfig("Router missing `app_list`".to_string())
        );

        let missing_db = MultiAppRouter::new(MultiAppRouterConfig {
            app_list: Some(AppList::from(vec!["foo"])),
            db_name: None,
        })
        .unwrap_err();
        assert_eq!(
            missing_db,
            RouterError::InvalidConfig("Router missing `db_name`".to_string())
        );
    }

    #[test]
    fn test_bare_string_app_list_rejected() {
        let result = MultiAppRouter::new(MultiAppRouterConfig {
            app_list: Some(AppList::Bare("foo".to_string())),
            db_name: Some("my_database".to_string()),
        });
        assert!(matches!(result, Err(RouterError::InvalidConfig(msg)) if msg.contains("must be a list")));
    }

    #[test]
    fn test_resolve_members() {
        let router = router();
        let hints = RoutingHints::none();

        for app in ["foo", "bar", "baz"] {
            assert_eq!(
                router.resolve_for_read(&model(app), &hints).as_deref(),
                Some("my_database")
            );
            assert_eq!(
                router.resolve_for_write(&model(app), &hints).as_deref(),
                Some("my_database")
            );
        }
        assert_eq!(router.resolve_for_read(&model("qux"), &hints), None);
        assert_eq!(router.resolve_for_write(&model("qux"), &hints), None);
    }

    #[test]
    fn test_allow_relation_within_group() {
        let router = router();

        assert_eq!(router.allow_relation(&model("foo"), &model("bar")), Permission::Allow);
        assert_eq!(router.allow_relation(&model("foo"), &model("qux")), Permission::Deny);
        assert_eq!(router.allow_relation(&model("qux"), &model("baz")), Permission::Deny);
        assert_eq!(router.allow_relation(&model("qux"), &model("quux")), Permission::Abstain);
    }

    #[test]
    fn test_allow_schema_migration() {
        let router = router();

        assert_eq!(router.allow_schema_migration("my_database", &model("foo")), Permission::Allow);
        assert_eq!(router.allow_schema_migration("my_database", &model("qux")), Permission::Deny);
        assert_eq!(router.allow_schema_migration("other_db", &model("foo")), Permission::Abstain);
        assert_eq!(router.allow_schema_migration("other_db", &model("qux")), Permission::Abstain);
    }

    #[test]
    fn test_bootstrap_app_on_any_db() {
        let router = router();
        let south = model("south");

        assert_eq!(router.allow_schema_migration("my_database", &south), Permission::Allow);
        assert_eq!(router.allow_schema_migration("other_db", &south), Permission::Allow);
    }
}
