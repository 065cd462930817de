//! Properties every routing policy must satisfy

use dbshard_router::{
    AppList, AppRouter, AppRouterConfig, DatabaseRouter, DbAlias, ModelDescriptor,
    MultiAppRouter, MultiAppRouterConfig, Permission, RouterChain, RouterError, RoutingConfig,
    RoutingHints, ShardRouter, ShardRouterConfig, ShardedInstance,
};

const APPS: &[&str] = &["test_app", "foo", "bar", "messages", "other_app", "south"];

const APP_MEMBERS: &[&str] = &["test_app"];
const MULTI_APP_MEMBERS: &[&str] = &["foo", "bar"];
const SHARD_MEMBERS: &[&str] = &["messages"];

/// A stored message whose shard is derived from its owner
struct Message {
    owner_id: u32,
}

impl ShardedInstance for Message {
    fn resolve_shard(&self) -> DbAlias {
        format!("shard_{:03}", self.owner_id % 3 + 1)
    }
}

fn model(app_label: &str) -> ModelDescriptor {
    ModelDescriptor::new(app_label, "Thing")
}

fn policies() -> Vec<Box<dyn DatabaseRouter>> {
    let app = AppRouter::new(AppRouterConfig::new("test_app", "test_db")).unwrap();
    let multi = MultiAppRouter::new(MultiAppRouterConfig::new(vec!["foo", "bar"], "feature_B")).unwrap();
    let shard = ShardRouter::new(ShardRouterConfig::new(["messages"], "shard_"));

    vec![
        Box::new(app) as Box<dyn DatabaseRouter>,
        Box::new(multi) as Box<dyn DatabaseRouter>,
        Box::new(shard) as Box<dyn DatabaseRouter>,
    ]
}

fn members(router: &dyn DatabaseRouter) -> &'static [&'static str] {
    match router.name() {
        "App" => APP_MEMBERS,
        "MultiApp" => MULTI_APP_MEMBERS,
        "Shard" => SHARD_MEMBERS,
        other => panic!("unknown router {}", other),
    }
}

#[test]
fn test_non_members_get_no_alias() {
    let message = Message { owner_id: 7 };
    for router in policies() {
        for app in APPS.iter().filter(|app| !members(router.as_ref()).contains(*app)) {
            for hints in [RoutingHints::none(), RoutingHints::with_instance(&message)] {
                assert_eq!(router.resolve_for_read(&model(app), &hints), None, "{} / {}", router.name(), app);
                assert_eq!(router.resolve_for_write(&model(app), &hints), None, "{} / {}", router.name(), app);
            }
        }
    }
}

#[test]
fn test_fixed_alias_for_members() {
    let app = AppRouter::new(AppRouterConfig::new("test_app", "test_db")).unwrap();
    let multi = MultiAppRouter::new(MultiAppRouterConfig::new(vec!["foo", "bar"], "feature_B")).unwrap();
    let hints = RoutingHints::none();

    assert_eq!(app.resolve_for_read(&model("test_app"), &hints).as_deref(), Some("test_db"));
    assert_eq!(app.resolve_for_write(&model("test_app"), &hints).as_deref(), Some("test_db"));
    for member in ["foo", "bar"] {
        assert_eq!(multi.resolve_for_read(&model(member), &hints).as_deref(), Some("feature_B"));
        assert_eq!(multi.resolve_for_write(&model(member), &hints).as_deref(), Some("feature_B"));
    }
}

#[test]
fn test_relation_is_symmetric_and_tri_state() {
    for router in policies() {
        let partition = members(router.as_ref());
        for a in APPS {
            for b in APPS {
                let forward = router.allow_relation(&model(a), &model(b));
                let backward = router.allow_relation(&model(b), &model(a));
                assert_eq!(forward, backward, "{}: {} <-> {}", router.name(), a, b);

                let expected = match (partition.contains(a), partition.contains(b)) {
                    (true, true) => Permission::Allow,
                    (false, false) => Permission::Abstain,
                    _ => Permission::Deny,
                };
                assert_eq!(forward, expected, "{}: {} -> {}", router.name(), a, b);
            }
        }
    }
}

#[test]
fn test_app_router_construction_matrix() {
    let cases = [
        (None, Some("foo"), false),
        (Some("foo"), None, false),
        (None, None, false),
        (Some("foo"), Some("bar"), true),
    ];

    for (app_name, db_name, ok) in cases {
        let result = AppRouter::new(AppRouterConfig {
            app_name: app_name.map(str::to_string),
            db_name: db_name.map(str::to_string),
        });
        match result {
            Ok(_) => assert!(ok, "{:?}/{:?} should fail", app_name, db_name),
            Err(RouterError::InvalidConfig(msg)) => {
                assert!(!ok, "{:?}/{:?} should succeed: {}", app_name, db_name, msg)
            }
        }
    }
}

#[test]
fn test_multi_app_router_rejects_bare_string() {
    let result = MultiAppRouter::new(MultiAppRouterConfig {
        app_list: Some(AppList::Bare("foo".to_string())),
        db_name: Some("feature_B".to_string()),
    });
    assert!(matches!(result, Err(RouterError::InvalidConfig(_))));
}

#[test]
fn test_bootstrap_app_migrations() {
    let south = model("south");
    let app = AppRouter::new(AppRouterConfig::new("test_app", "test_db")).unwrap();
    assert_eq!(app.allow_schema_migration("test_db", &south), Permission::Allow);

    let multi = MultiAppRouter::new(MultiAppRouterConfig::new(vec!["foo"], "feature_B")).unwrap();
    let shard = ShardRouter::new(ShardRouterConfig::new(["messages"], "shard_"));
    for db in ["default", "feature_B", "shard_001", "other_db"] {
        assert_eq!(multi.allow_schema_migration(db, &south), Permission::Allow);
        assert_eq!(shard.allow_schema_migration(db, &south), Permission::Allow);
    }
}

#[test]
fn test_shard_router_needs_instance() {
    let shard = ShardRouter::new(ShardRouterConfig::new(["messages"], "shard_"));
    let message = Message { owner_id: 4 };

    assert_eq!(shard.resolve_for_read(&model("messages"), &RoutingHints::none()), None);
    assert_eq!(
        shard.resolve_for_read(&model("messages"), &RoutingHints::with_instance(&message)),
        Some(message.resolve_shard())
    );
    assert_eq!(message.resolve_shard(), "shard_002");
}

#[test]
fn test_shard_router_migration_matrix() {
    let shard = ShardRouter::new(ShardRouterConfig::new(["messages"], "shard_"));

    assert_eq!(shard.allow_schema_migration("shard_002", &model("messages")), Permission::Allow);
    assert_eq!(shard.allow_schema_migration("other_db", &model("messages")), Permission::Deny);
    assert_eq!(shard.allow_schema_migration("shard_002", &model("billing")), Permission::Deny);
    assert_eq!(shard.allow_schema_migration("other_db", &model("billing")), Permission::Abstain);
}

#[test]
fn test_chain_from_json_config() {
    let config = RoutingConfig::from_json_str(
        r#"{
            "routers": [
                { "kind": "app", "app_name": "test_app", "db_name": "test_db" },
                { "kind": "multi_app", "app_list": ["foo", "bar"], "db_name": "feature_B" },
                { "kind": "shard", "app_list": ["messages"], "db_name_prefix": "shard_" }
            ]
        }"#,
    )
    .unwrap();
    let chain = RouterChain::from_config(&config).unwrap();
    let message = Message { owner_id: 2 };

    assert_eq!(chain.db_for_read(&model("bar"), &RoutingHints::none()).alias, "feature_B");
    assert_eq!(
        chain.db_for_write(&model("messages"), &RoutingHints::with_instance(&message)).alias,
        "shard_003"
    );
    assert_eq!(chain.db_for_read(&model("unrouted"), &RoutingHints::none()).alias, "default");
}

#[test]
fn test_chain_rejects_bare_string_from_json() {
    let config = RoutingConfig::from_json_str(
        r#"{ "routers": [{ "kind": "multi_app", "app_list": "foo", "db_name": "feature_B" }] }"#,
    )
    .unwrap();
    assert!(matches!(
        RouterChain::from_config(&config),
        Err(RouterError::InvalidConfig(_))
    ));
}

#[test]
fn test_permission_wire_format() {
    assert_eq!(serde_json::to_string(&Permission::Abstain).unwrap(), r#""abstain""#);
    assert_eq!(Permission::from(Some(false)), Permission::Deny);
    assert_eq!(Permission::from(None), Permission::Abstain);
    assert_eq!(Permission::Allow.as_option(), Some(true));
    assert_eq!(Permission::Deny.to_string(), "deny");
    assert!(Permission::Abstain.allowed_by_default());
    assert!(!Permission::Deny.allowed_by_default());
}
