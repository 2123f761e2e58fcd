//! Task store: sole owner and mutator of the task collection.
//!
//! # Responsibility
//! - Provide create/toggle/edit/delete/query entry points for the boundary.
//! - Serialize the whole collection to the adapter after every mutation.
//! - Recover from corrupt persisted state instead of propagating it.
//!
//! # Invariants
//! - Task ids are unique within the collection at all times.
//! - Insertion order is preserved; no reordering operation exists.
//! - A rejected mutation leaves both memory and storage untouched.

use crate::kv::{KvError, KvStore};
use crate::model::task::{Task, TaskId, TaskValidationError};
use log::warn;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key the serialized collection is written under.
pub const TASKS_KEY: &str = "tasks";

pub type StoreResult<T> = Result<T, StoreError>;

/// Task store error for mutation and load operations.
#[derive(Debug)]
pub enum StoreError {
    /// Uniqueness policy rejection; the boundary surfaces it to the user.
    Duplicate { text: String },
    /// Task invariant violated on a write path.
    Validation(TaskValidationError),
    /// Persistence adapter failure.
    Kv(KvError),
    /// The collection could not be serialized for the flush.
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate { text } => write!(f, "a task named `{text}` already exists"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Kv(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize task collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Duplicate { .. } => None,
            Self::Validation(err) => Some(err),
            Self::Kv(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Sole owner of the ordered task collection.
///
/// Constructed explicitly by the application entry point with the persistence
/// adapter injected; there is no ambient process-wide instance.
pub struct TaskStore<S: KvStore> {
    kv: S,
    tasks: Vec<Task>,
    unique_text: bool,
}

impl<S: KvStore> TaskStore<S> {
    /// Loads the persisted collection through the provided adapter.
    ///
    /// # Contract
    /// - An absent stored value initializes an empty collection.
    /// - A stored value that fails to parse, or that violates the task
    ///   invariants, is logged, removed from the adapter and replaced by an
    ///   empty collection. Corruption never propagates to the caller.
    ///
    /// # Errors
    /// - Adapter transport failures propagate as `StoreError::Kv`.
    pub fn load(kv: S) -> StoreResult<Self> {
        let tasks = match kv.get(TASKS_KEY)? {
            None => Vec::new(),
            Some(raw) => match parse_collection(&raw) {
                Ok(tasks) => tasks,
                Err(reason) => {
                    warn!("event=tasks_load module=store status=corrupt reason={reason}");
                    kv.remove(TASKS_KEY)?;
                    Vec::new()
                }
            },
        };

        Ok(Self {
            kv,
            tasks,
            unique_text: false,
        })
    }

    /// Enables or disables case-insensitive text uniqueness for create/edit.
    ///
    /// Off by default; when enabled, duplicates are rejected with
    /// `StoreError::Duplicate` instead of being silently merged.
    pub fn with_unique_text(mut self, unique_text: bool) -> Self {
        self.unique_text = unique_text;
        self
    }

    /// Appends a new pending task built from `text`.
    ///
    /// # Contract
    /// - `text` is trimmed first; an empty result is a silent no-op
    ///   (`Ok(None)`, nothing persisted).
    /// - Under the uniqueness policy a case-insensitive duplicate is
    ///   rejected and nothing changes.
    /// - On success the whole collection is flushed before returning the
    ///   created task.
    pub fn create(&mut self, text: &str) -> StoreResult<Option<Task>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        self.check_duplicate(trimmed, None)?;

        let task = Task::new(trimmed)?;
        self.tasks.push(task.clone());
        self.persist()?;
        Ok(Some(task))
    }

    /// Flips the completion flag of the task with `id`.
    ///
    /// Returns the new flag, or `Ok(None)` as a no-op when `id` is unknown.
    /// Applying it twice returns the flag to its original value.
    pub fn toggle(&mut self, id: TaskId) -> StoreResult<Option<bool>> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };

        task.completed = !task.completed;
        let completed = task.completed;
        self.persist()?;
        Ok(Some(completed))
    }

    /// Replaces the text of the task with `id`.
    ///
    /// # Contract
    /// - `new_text` is trimmed first; an empty result keeps the prior text
    ///   and returns `Ok(false)`.
    /// - A case-insensitive duplicate (excluding the task itself) under the
    ///   uniqueness policy is rejected with prior text intact.
    /// - An unknown `id` is a no-op (`Ok(false)`).
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> StoreResult<bool> {
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(false);
        };
        self.check_duplicate(trimmed, Some(id))?;

        self.tasks[index].text = trimmed.to_string();
        self.persist()?;
        Ok(true)
    }

    /// Removes the task with `id` if present.
    ///
    /// State removal and its persistence happen synchronously with this
    /// call; deferred visual acknowledgment is the view boundary's concern.
    /// An unknown `id` is a no-op (`Ok(false)`), so repeated deletes are
    /// safe.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }

        self.persist()?;
        Ok(true)
    }

    /// Returns the full ordered collection as a read-only view.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks in the collection.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the collection holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn check_duplicate(&self, text: &str, exclude: Option<TaskId>) -> StoreResult<()> {
        if !self.unique_text {
            return Ok(());
        }

        let needle = text.to_lowercase();
        let clash = self.tasks.iter().any(|task| {
            exclude != Some(task.id) && task.text.to_lowercase() == needle
        });
        if clash {
            return Err(StoreError::Duplicate {
                text: text.to_string(),
            });
        }
        Ok(())
    }

    // Full-collection flush under the fixed key. O(n) per mutation is the
    // accepted cost of keeping memory and storage trivially consistent.
    fn persist(&self) -> StoreResult<()> {
        let payload = serde_json::to_string(&self.tasks).map_err(StoreError::Serialize)?;
        self.kv.set(TASKS_KEY, &payload)?;
        Ok(())
    }
}

fn parse_collection(raw: &str) -> Result<Vec<Task>, String> {
    let tasks: Vec<Task> =
        serde_json::from_str(raw).map_err(|err| format!("unparsable_payload:{err}"))?;

    let mut seen = HashSet::new();
    for task in &tasks {
        task.validate()
            .map_err(|err| format!("invalid_record:{err}"))?;
        if !seen.insert(task.id) {
            return Err(format!("duplicate_id:{}", task.id));
        }
    }

    Ok(tasks)
}
