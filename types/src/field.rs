//! Persisted field types
//!
//! - `BigIntegerField`: plain 64-bit integer column
//! - `BigAutoField`: auto-incrementing 64-bit primary key
//! - `ExternalIdField`: 64-bit primary key populated by an id generator
//!
//! Sharded tables cannot rely on per-database sequences for globally unique
//! keys, which is what `ExternalIdField` is for.

use tracing::trace;
use uuid::Uuid;

use crate::engine::DbEngine;
use crate::{FieldError, FieldResult};

/// Column type rendering per backend
pub trait ColumnType {
    /// SQL column type used on the given engine
    fn db_type(&self, engine: &DbEngine) -> String;
}

/// Anything that carries an integer primary key
pub trait PrimaryKeyed {
    fn pk(&self) -> Option<i64>;

    fn set_pk(&mut self, id: i64);
}

/// Source of primary key values
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> i64;
}

impl<F> IdGenerator for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn next_id(&self) -> i64 {
        self()
    }
}

/// Random positive 63-bit ids taken from a v4 uuid
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> i64 {
        let bits = Uuid::new_v4().as_u128() as u64 & (i64::MAX as u64);
        // zero is not a usable key
        (bits as i64).max(1)
    }
}

/// 64-bit integer column
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntegerField;

impl ColumnType for BigIntegerField {
    fn db_type(&self, _engine: &DbEngine) -> String {
        "bigint".to_string()
    }
}

/// Auto-incrementing 64-bit primary key
#[derive(Debug, Clone, Copy, Default)]
pub struct BigAutoField;

impl ColumnType for BigAutoField {
    fn db_type(&self, engine: &DbEngine) -> String {
        match engine {
            DbEngine::MySql => "bigint AUTO_INCREMENT".to_string(),
            DbEngine::PostgreSql => "bigserial".to_string(),
            other => BigIntegerField.db_type(other),
        }
    }
}

/// Primary key field filled in from an external id generator
pub struct ExternalIdField<G: IdGenerator = RandomIdGenerator> {
    generator: G,
}

impl ExternalIdField<RandomIdGenerator> {
    /// Create a field backed by random ids
    pub fn random() -> Self {
        Self::new(RandomIdGenerator)
    }
}

impl<G: IdGenerator> ExternalIdField<G> {
    /// Create a field backed by the given generator
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Populate the primary key before the instance is saved.
    ///
    /// A key is only generated when the instance does not have a usable one
    /// yet; a zero or negative key counts as unset.
    /// Returns the key the instance will be saved with.
    pub fn pre_save(&self, instance: &mut dyn PrimaryKeyed, add: bool) -> FieldResult<i64> {
        if let Some(pk) = instance.pk().filter(|pk| *pk > 0) {
            return Ok(pk);
        }

        let id = self.generator.next_id();
        if id <= 0 {
            return Err(FieldError::InvalidGeneratedId(id));
        }

        trace!(id, add, "Generated external id");
        instance.set_pk(id);
        Ok(id)
    }
}

impl<G: IdGenerator> ColumnType for ExternalIdField<G> {
    fn db_type(&self, engine: &DbEngine) -> String {
        BigIntegerField.db_type(engine)
    }
}

impl<G: IdGenerator> std::fmt::Debug for ExternalIdField<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalIdField").finish_non_exhaustive()
    }
}
