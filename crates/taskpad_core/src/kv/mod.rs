//! Persistence adapter contract and SQLite bootstrap entry points.
//!
//! # Responsibility
//! - Define the opaque string key-value contract the stores persist through.
//! - Open and configure SQLite connections backing that contract.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Stores must not read/write application data before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod sqlite;

pub use open::{open_store, open_store_in_memory};
pub use sqlite::SqliteKvStore;

pub type KvResult<T> = Result<T, KvError>;

/// Transport and bootstrap errors of the persistence adapter.
#[derive(Debug)]
pub enum KvError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection has schema version {actual_version}, expected {expected_version}; \
                 open it through `open_store` first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Opaque durable key-value store consumed by the task, filter and theme
/// stores.
///
/// The engine only ever needs these three operations; everything else about
/// the medium (schema, file layout, caching) stays behind this trait.
pub trait KvStore {
    /// Returns the stored value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> KvResult<()>;

    /// Removes `key` if present; absent keys are a no-op.
    fn remove(&self, key: &str) -> KvResult<()>;
}
