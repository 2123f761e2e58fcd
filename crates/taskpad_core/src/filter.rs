//! Filter engine: projection from the task collection to a display subset.
//!
//! # Responsibility
//! - Project the ordered collection through a closed set of display modes.
//! - Persist the currently selected mode so it survives restarts.
//!
//! # Invariants
//! - Projection preserves input order in every mode; no re-sorting.
//! - Invalid modes are unrepresentable past the boundary parser.

use crate::kv::{KvResult, KvStore};
use crate::model::task::Task;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Fixed key the current filter mode is written under.
pub const FILTER_KEY: &str = "filter";

/// Closed set of display filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Pending,
    Completed,
}

impl FilterMode {
    /// Stable string form used for persistence and CLI round-trips.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Out-of-set filter mode supplied at a boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterModeError {
    pub value: String,
}

impl Display for ParseFilterModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid filter mode `{}`; expected all|pending|completed",
            self.value
        )
    }
}

impl Error for ParseFilterModeError {}

impl FromStr for FilterMode {
    type Err = ParseFilterModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(ParseFilterModeError {
                value: other.to_string(),
            }),
        }
    }
}

/// Projects `tasks` through `mode`, preserving input order.
///
/// `All` is the identity projection; `Pending` and `Completed` partition the
/// collection by the completion flag.
pub fn apply(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| match mode {
            FilterMode::All => true,
            FilterMode::Pending => !task.completed,
            FilterMode::Completed => task.completed,
        })
        .collect()
}

/// Holder of the persisted current mode used by the view boundary.
pub struct FilterEngine<S: KvStore> {
    kv: S,
    mode: FilterMode,
}

impl<S: KvStore> FilterEngine<S> {
    /// Loads the persisted mode, defaulting to `All` when absent.
    ///
    /// An out-of-set persisted value is logged and treated as absent; the
    /// stored value is left for the next `set_mode` to overwrite.
    pub fn load(kv: S) -> KvResult<Self> {
        let mode = match kv.get(FILTER_KEY)? {
            None => FilterMode::default(),
            Some(raw) => match raw.parse::<FilterMode>() {
                Ok(mode) => mode,
                Err(err) => {
                    warn!(
                        "event=filter_load module=filter status=invalid value={}",
                        err.value
                    );
                    FilterMode::default()
                }
            },
        };

        Ok(Self { kv, mode })
    }

    /// Persists `mode` and makes it current for subsequent projections.
    ///
    /// The previous mode is retained when the adapter write fails.
    pub fn set_mode(&mut self, mode: FilterMode) -> KvResult<()> {
        self.kv.set(FILTER_KEY, mode.as_str())?;
        self.mode = mode;
        Ok(())
    }

    /// Mode last set or loaded; `All` when nothing was ever persisted.
    pub fn current(&self) -> FilterMode {
        self.mode
    }

    /// Projects `tasks` through the current mode.
    pub fn apply_current<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        apply(tasks, self.mode)
    }
}
