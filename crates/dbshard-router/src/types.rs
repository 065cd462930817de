//! Common types for the router module
//!
//! Centralizes type definitions to avoid duplication across modules.

use serde::{Deserialize, Serialize};

use dbshard_types::ShardedInstance;

/// Verdict of a router on a relation or migration question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Explicitly allowed
    Allow,
    /// Explicitly forbidden
    Deny,
    /// No opinion, defer to the next router
    Abstain,
}

impl Permission {
    /// Allow when `allowed`, otherwise deny
    pub fn from_membership(allowed: bool) -> Self {
        if allowed {
            Permission::Allow
        } else {
            Permission::Deny
        }
    }

    /// Whether the router took a position
    pub fn is_decided(self) -> bool {
        !matches!(self, Permission::Abstain)
    }

    /// Final answer once no router is left to ask: only `Deny` forbids
    pub fn allowed_by_default(self) -> bool {
        !matches!(self, Permission::Deny)
    }

    /// `Some(true)` / `Some(false)` / `None`
    pub fn as_option(self) -> Option<bool> {
        match self {
            Permission::Allow => Some(true),
            Permission::Deny => Some(false),
            Permission::Abstain => None,
        }
    }
}

impl From<Option<bool>> for Permission {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Permission::Abstain, Permission::from_membership)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Allow => write!(f, "allow"),
            Permission::Deny => write!(f, "deny"),
            Permission::Abstain => write!(f, "abstain"),
        }
    }
}

/// Extra context passed along with a read or write routing query
#[derive(Clone, Copy, Default)]
pub struct RoutingHints<'a> {
    /// Instance being read or written, if known
    pub instance: Option<&'a dyn ShardedInstance>,
}

impl<'a> RoutingHints<'a> {
    /// No hints
    pub fn none() -> Self {
        Self::default()
    }

    /// Hints carrying the instance being routed
    pub fn with_instance(instance: &'a dyn ShardedInstance) -> Self {
        Self { instance: Some(instance) }
    }
}

impl std::fmt::Debug for RoutingHints<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingHints")
            .field("instance", &self.instance.is_some())
            .finish()
    }
}
