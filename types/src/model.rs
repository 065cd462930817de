//! Model descriptors - the record-type side of routing
//!
//! Routers only ever look at the owning application of a model, and for
//! sharded apps, at the shard an individual instance lives in.

use serde::{Deserialize, Serialize};

/// Database alias (name of a configured connection)
pub type DbAlias = String;

/// Alias used when no router has an opinion
pub const DEFAULT_DB_ALIAS: &str = "default";

/// Applications owned by the migration framework itself.
///
/// Their tables must exist wherever migrations are tracked, so routers let
/// them through regardless of partitioning.
pub const BOOTSTRAP_APP_LABELS: &[&str] = &["south"];

/// Check whether an app label belongs to the migration framework
pub fn is_bootstrap_app(app_label: &str) -> bool {
    BOOTSTRAP_APP_LABELS.contains(&app_label)
}

/// Read-only metadata of a persisted record type
pub trait ModelMeta {
    /// Label of the application that owns the model
    fn app_label(&self) -> &str;

    /// Model name within its application
    fn model_name(&self) -> &str;
}

/// Shard lookup for a single record instance
pub trait ShardedInstance {
    /// Alias of the database this instance is stored in
    fn resolve_shard(&self) -> DbAlias;
}

/// Plain model descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Owning application label
    pub app_label: String,

    /// Model name
    pub model_name: String,
}

impl ModelDescriptor {
    /// Create a new descriptor
    pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            app_label: app_label.into(),
            model_name: model_name.into(),
        }
    }
}

impl ModelMeta for ModelDescriptor {
    fn app_label(&self) -> &str {
        &self.app_label
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl std::fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.app_label, self.model_name)
    }
}
