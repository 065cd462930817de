//! dbshard Inspect - Routing configuration inspector
//!
//! The inspector is responsible for:
//! - Building the router chain from a routing configuration
//! - Reporting where reads and writes of a model go
//! - Reporting which databases may hold the model's table

use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

use dbshard_core::{ConfigError, RoutingConfig};
use dbshard_router::{Permission, RouterChain, RouterError, RoutingDecision, RoutingHints};
use dbshard_types::{BigAutoField, ColumnType, DbAlias, ModelDescriptor, ShardedInstance};

/// Inspector errors
#[derive(Debug, Error)]
pub enum InspectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Command line arguments
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "dbshard-inspect")]
#[command(version, about = "Report how a routing configuration places a model")]
pub struct InspectArgs {
    /// Model to inspect, as `<app_label>` or `<app_label>.<Model>`
    #[arg(value_parser = parse_model)]
    pub model: ModelDescriptor,

    /// Shard the inspected instance lives in
    pub shard: Option<DbAlias>,
}

/// Parse `<app_label>[.<Model>]` into a model descriptor
fn parse_model(raw: &str) -> Result<ModelDescriptor, String> {
    let (app_label, model_name) = raw.split_once('.').unwrap_or((raw, "Model"));
    if app_label.is_empty() || model_name.is_empty() {
        return Err(format!("invalid model `{}`, expected <app_label>[.<Model>]", raw));
    }
    Ok(ModelDescriptor::new(app_label, model_name))
}

/// Instance pinned to a known shard
#[derive(Debug, Clone)]
pub struct StaticShard(pub DbAlias);

impl ShardedInstance for StaticShard {
    fn resolve_shard(&self) -> DbAlias {
        self.0.clone()
    }
}

/// Where one kind of query goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteTarget {
    pub alias: DbAlias,
    /// Router that decided (absent = default alias)
    pub decided_by: Option<&'static str>,
    /// Primary key column type on the target's engine, if the alias is configured
    pub pk_column: Option<String>,
}

/// Routing report for one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteReport {
    pub model: ModelDescriptor,
    pub shard_hint: Option<DbAlias>,
    pub read: RouteTarget,
    pub write: RouteTarget,
    /// Migration verdict per configured database (`abstain` = nobody objects)
    pub migrations: BTreeMap<DbAlias, Permission>,
}

/// Routing configuration inspector
pub struct Inspector {
    config: RoutingConfig,
    chain: RouterChain,
}

impl Inspector {
    /// Create an inspector, building every configured router
    pub fn new(config: RoutingConfig) -> Result<Self, InspectError> {
        let chain = RouterChain::from_config(&config)?;
        info!(
            databases = config.databases.len(),
            routers = chain.len(),
            "Creating inspector"
        );
        Ok(Self { config, chain })
    }

    /// Create an inspector from environment configuration
    pub fn from_env() -> Result<Self, InspectError> {
        Self::new(RoutingConfig::from_env()?)
    }

    pub fn chain(&self) -> &RouterChain {
        &self.chain
    }

    /// Report routing of `model`, optionally for an instance on `shard`
    pub fn report(&self, model: &ModelDescriptor, shard: Option<&str>) -> RouteReport {
        let instance = shard.map(|alias| StaticShard(alias.to_string()));
        let hints = match &instance {
            Some(instance) => RoutingHints::with_instance(instance),
            None => RoutingHints::none(),
        };

        let read = self.target(self.chain.db_for_read(model, &hints));
        let write = self.target(self.chain.db_for_write(model, &hints));

        let migrations = self
            .config
            .databases
            .keys()
            .map(|alias| (alias.clone(), self.chain.allow_schema_migration(alias, model)))
            .collect();

        debug!(model = %model, read = %read.alias, write = %write.alias, "Built route report");
        RouteReport {
            model: model.clone(),
            shard_hint: shard.map(str::to_string),
            read,
            write,
            migrations,
        }
    }

    fn target(&self, decision: RoutingDecision) -> RouteTarget {
        let pk_column = self
            .config
            .engine_for(&decision.alias)
            .map(|engine| BigAutoField.db_type(engine));
        RouteTarget {
            alias: decision.alias,
            decided_by: decision.decided_by,
            pk_column,
        }
    }
}
