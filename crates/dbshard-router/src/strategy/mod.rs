//! Routing Strategies
//!
//! This module contains the database routing policies:
//!
//! - `AppRouter`: One app → one database
//! - `MultiAppRouter`: Several related apps → one database
//! - `ShardRouter`: Several apps → the shard each instance lives in
//!
//! # Decision Shape
//!
//! ```text
//! Model (+ hints)
//!     │
//!     ▼
//! ┌─────────────────────────┐
//! │   Partition membership  │  app_label == app / in app_list
//! └───────────┬─────────────┘
//!             │
//!      ┌──────┴──────┐
//!      ▼             ▼
//!   member       non-member
//!   alias         Abstain / None
//! ```

mod app;
mod multi_app;
mod shard;

pub use app::AppRouter;
pub use multi_app::MultiAppRouter;
pub use shard::ShardRouter;

use dbshard_types::{DbAlias, ModelMeta};

use crate::types::{Permission, RoutingHints};

/// Trait for database routing policies
///
/// `None` / `Permission::Abstain` mean "no opinion": the caller moves on to
/// the next router.
pub trait DatabaseRouter: Send + Sync {
    /// Database to read `model` from
    fn resolve_for_read(&self, model: &dyn ModelMeta, hints: &RoutingHints<'_>) -> Option<DbAlias>;

    /// Database to write `model` to
    fn resolve_for_write(&self, model: &dyn ModelMeta, hints: &RoutingHints<'_>) -> Option<DbAlias>;

    /// Whether a relation between instances of `a` and `b` is allowed
    fn allow_relation(&self, a: &dyn ModelMeta, b: &dyn ModelMeta) -> Permission;

    /// Whether `model`'s table may be created on database `db`
    fn allow_schema_migration(&self, db: &str, model: &dyn ModelMeta) -> Permission;

    /// Router name for logging
    fn name(&self) -> &'static str;
}

/// Relations are allowed inside a partition and forbidden across its border.
pub(crate) fn relation_permission(a_member: bool, b_member: bool) -> Permission {
    match (a_member, b_member) {
        (true, true) => Permission::Allow,
        (true, false) | (false, true) => Permission::Deny,
        (false, false) => Permission::Abstain,
    }
}
