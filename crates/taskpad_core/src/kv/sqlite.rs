//! SQLite implementation of the key-value contract.
//!
//! # Responsibility
//! - Map get/set/remove onto a single `kv` table.
//! - Reject connections that were not bootstrapped through `open_store`.
//!
//! # Invariants
//! - `set` is an upsert; a key holds at most one value.
//! - Values are stored verbatim; the adapter never inspects them.

use super::migrations::latest_version;
use super::{KvError, KvResult, KvStore};
use rusqlite::{params, Connection, OptionalExtension};

/// SQLite-backed key-value store borrowing an opened connection.
///
/// Cheap to construct; every store component holds its own handle onto the
/// one process-wide connection.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps an opened connection after checking it was bootstrapped.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match
    ///   the latest migration known by this binary.
    /// - `MissingRequiredTable` when the `kv` table is absent.
    pub fn try_new(conn: &'conn Connection) -> KvResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(KvError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'kv'
            );",
            [],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(KvError::MissingRequiredTable("kv"));
        }

        Ok(Self { conn })
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1;", [key])?;
        Ok(())
    }
}
