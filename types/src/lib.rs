// ========== Core Modules ==========
pub mod model;
pub mod engine;

// ========== Persisted Fields ==========
pub mod field;

// Export commonly used types
pub use model::{
    ModelMeta, ModelDescriptor, ShardedInstance, DbAlias,
    DEFAULT_DB_ALIAS, BOOTSTRAP_APP_LABELS, is_bootstrap_app,
};
pub use engine::DbEngine;

// Field related
pub use field::{
    ColumnType, BigIntegerField, BigAutoField, ExternalIdField,
    IdGenerator, RandomIdGenerator, PrimaryKeyed,
};

// Error types
pub type FieldResult<T> = Result<T, FieldError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Generated id must be positive, got {0}")]
    InvalidGeneratedId(i64),

    #[error("Unknown database engine: {0}")]
    UnknownEngine(String),
}
