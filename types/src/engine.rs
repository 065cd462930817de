//! Database backend engines
//!
//! Column types are rendered per backend, so fields need to know which
//! engine a connection runs on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::FieldError;

/// Database backend engine
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DbEngine {
    MySql,
    PostgreSql,
    Sqlite,
    /// Any other backend, kept as written (e.g. `django.db.backends.oracle`).
    ///
    /// Parsing never yields `Other` for a recognized backend, so an `Other`
    /// holding `mysql` is normalized to `MySql` when read back.
    Other(String),
}

impl DbEngine {
    /// Short name of a known backend, or the stored name of any other
    pub fn as_str(&self) -> &str {
        match self {
            DbEngine::MySql => "mysql",
            DbEngine::PostgreSql => "postgresql",
            DbEngine::Sqlite => "sqlite3",
            DbEngine::Other(name) => name,
        }
    }
}

impl FromStr for DbEngine {
    type Err = FieldError;

    /// Accepts a short name (`mysql`) or a dotted backend path
    /// (`django.db.backends.mysql`); only the last segment is significant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let name = raw.rsplit('.').next().unwrap_or_default();
        match name {
            "" => Err(FieldError::UnknownEngine(s.to_string())),
            "mysql" => Ok(DbEngine::MySql),
            "postgresql" | "postgresql_psycopg2" | "postgres" => Ok(DbEngine::PostgreSql),
            "sqlite3" | "sqlite" => Ok(DbEngine::Sqlite),
            _ => Ok(DbEngine::Other(raw.to_string())),
        }
    }
}

impl std::fmt::Display for DbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for DbEngine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DbEngine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
