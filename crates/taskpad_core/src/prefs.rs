//! Preference store: the persisted display theme.
//!
//! # Responsibility
//! - Keep the theme choice with a lifecycle independent of tasks.
//!
//! # Invariants
//! - The theme is a steady two-value oscillation; `toggle` is its only
//!   transition.

use crate::kv::{KvResult, KvStore};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Fixed key the theme choice is written under.
pub const THEME_KEY: &str = "theme";

/// Display theme selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stable string form used for persistence and CLI round-trips.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Out-of-set theme value supplied at a boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError {
    pub value: String,
}

impl Display for ParseThemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid theme `{}`; expected light|dark", self.value)
    }
}

impl Error for ParseThemeError {}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeError {
                value: other.to_string(),
            }),
        }
    }
}

/// Persisted theme choice with a tiny load/toggle/current surface.
pub struct ThemePrefs<S: KvStore> {
    kv: S,
    theme: Theme,
}

impl<S: KvStore> ThemePrefs<S> {
    /// Loads the persisted theme, defaulting to `Light` when absent.
    ///
    /// An out-of-set persisted value is logged and treated as absent.
    pub fn load(kv: S) -> KvResult<Self> {
        let theme = match kv.get(THEME_KEY)? {
            None => Theme::default(),
            Some(raw) => match raw.parse::<Theme>() {
                Ok(theme) => theme,
                Err(err) => {
                    warn!(
                        "event=theme_load module=prefs status=invalid value={}",
                        err.value
                    );
                    Theme::default()
                }
            },
        };

        Ok(Self { kv, theme })
    }

    /// Flips between light and dark, persists, and returns the new value.
    ///
    /// The previous theme is retained when the adapter write fails.
    pub fn toggle(&mut self) -> KvResult<Theme> {
        let next = self.theme.toggled();
        self.kv.set(THEME_KEY, next.as_str())?;
        self.theme = next;
        Ok(next)
    }

    /// Current in-memory value.
    pub fn current(&self) -> Theme {
        self.theme
    }
}
