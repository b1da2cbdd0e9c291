//! Light/dark theme preference

use crate::storage::{self, Storage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Colour theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl Theme {
    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Stored name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"') {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// A theme persisted under one storage key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePreference {
    key: &'static str,
    theme: Theme,
}

impl ThemePreference {
    /// Restore the theme stored under `key`, falling back to light.
    ///
    /// Accepts both the JSON form (`"dark"`) and a bare word (`dark`).
    #[must_use]
    pub fn load(storage: &dyn Storage, key: &'static str) -> Self {
        let theme = match storage.get(key) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(key, error = %e, "Ignoring stored theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Could not read theme");
                Theme::default()
            }
        };
        Self { key, theme }
    }

    /// Current theme
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Storage key
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Flip and persist the theme
    pub fn toggle(&mut self, storage: &dyn Storage) -> Theme {
        self.theme = self.theme.toggled();
        storage::save_json(storage, self.key, &self.theme);
        tracing::debug!(key = self.key, theme = %self.theme, "Theme toggled");
        self.theme
    }
}
