//! Core task state engine for Taskpad.
//! This crate is the single source of truth for business invariants.

pub mod filter;
pub mod kv;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod store;

pub use filter::{FilterEngine, FilterMode, ParseFilterModeError};
pub use kv::{open_store, open_store_in_memory, KvError, KvStore, SqliteKvStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use prefs::{ParseThemeError, Theme, ThemePrefs};
pub use store::task_store::{StoreError, TaskStore, TASKS_KEY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
