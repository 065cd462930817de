//! dbshard Router - Database Routing Policies
//!
//! Decides which database serves each model: reads, writes, relations
//! between models, and where tables may be migrated.
//!
//! # Architecture
//!
//! ```text
//! Query (model, hints)
//!     │
//!     ▼
//! ┌─────────────────────────┐
//! │      RouterChain        │  Consults routers in order
//! │  (Who has an opinion?)  │
//! └───────────┬─────────────┘
//!             │
//!             ▼
//! ┌─────────────────────────┐
//! │    DatabaseRouter       │  App / MultiApp / Shard policy
//! │    (Which database?)    │
//! └─────────────────────────┘
//! ```
//!
//! # Routing Policies
//!
//! - **AppRouter**: One app → one database, no relations across the border
//! - **MultiAppRouter**: Related apps → one database
//! - **ShardRouter**: Apps → the shard database of each instance
//!
//! # Example
//!
//! ```rust
//! use dbshard_router::{AppRouter, AppRouterConfig, DatabaseRouter, ModelDescriptor, RoutingHints};
//!
//! let router = AppRouter::new(AppRouterConfig::new("billing", "feature_A")).unwrap();
//! let invoice = ModelDescriptor::new("billing", "Invoice");
//!
//! assert_eq!(
//!     router.resolve_for_read(&invoice, &RoutingHints::none()).as_deref(),
//!     Some("feature_A"),
//! );
//! ```

// Core modules
mod error;
mod types;

// Strategy module (contains all routing policies)
mod strategy;

// Routers
mod chain;

// Re-exports: Error types
pub use error::RouterError;

// Re-exports: Core types
pub use types::{Permission, RoutingHints};
pub use dbshard_types::{
    ModelMeta, ModelDescriptor, ShardedInstance, DbAlias,
    DEFAULT_DB_ALIAS, BOOTSTRAP_APP_LABELS,
};

// Re-exports: Configuration
pub use dbshard_core::{
    AppList, AppRouterConfig, MultiAppRouterConfig, ShardRouterConfig, RouterSpec, RoutingConfig,
};

// Re-exports: Strategy trait and implementations
pub use strategy::{DatabaseRouter, AppRouter, MultiAppRouter, ShardRouter};

// Re-exports: Chain
pub use chain::{RouterChain, RoutingDecision, build_router};
