//! Error types for the router module

use thiserror::Error;

/// Router error types
///
/// Only raised while building a router; routing itself never fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouterError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RouterError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        RouterError::InvalidConfig(msg.into())
    }
}
