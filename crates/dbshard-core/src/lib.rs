//! dbshard Core - Shared configuration for routers and tools
//!
//! This crate provides the configuration types used by both
//! dbshard-router and dbshard-inspect.

pub mod config;

pub use config::{
    AppList, AppRouterConfig, ConfigError, DatabaseConfig, MultiAppRouterConfig,
    RouterSpec, RoutingConfig, ShardRouterConfig, CONFIG_PATH_ENV, DEFAULT_DB_ENV,
};
