//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record owned by the task store.
//! - Validate the text and identity contract on construction and reads.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `text` is trimmed and non-empty for every valid task.
//! - `created_at` is immutable after creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Validation failures for task construction and persisted reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty or whitespace-only after trimming.
    EmptyText,
    /// `id` is the nil UUID.
    NilId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be empty"),
            Self::NilId => write!(f, "task id must not be the nil uuid"),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable ID used for toggle/edit/delete addressing.
    pub id: TaskId,
    /// Human-readable label; trimmed, never empty.
    pub text: String,
    /// Completion flag flipped by toggle.
    pub completed: bool,
    /// Unix epoch milliseconds at creation. Record-keeping only; the store
    /// orders tasks by insertion, not by this value.
    pub created_at: i64,
}

impl Task {
    /// Creates a pending task with a generated stable ID and current time.
    ///
    /// # Invariants
    /// - `text` is trimmed before storage.
    /// - `completed` starts as `false`.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyText` when the trimmed text is empty.
    pub fn new(text: &str) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), text, now_epoch_ms())
    }

    /// Creates a pending task with a caller-provided ID and timestamp.
    ///
    /// Used by test fixtures and import paths where identity already exists.
    pub fn with_id(id: TaskId, text: &str, created_at: i64) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            text: text.trim().to_string(),
            completed: false,
            created_at,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks the task invariants, used on writes and persisted reads.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
