#![forbid(unsafe_code)]

//! List tuning loaded from TOML or JSON.
//!
//! ```toml
//! # vlist.toml
//! item_height = 3
//! overscan = 5
//! show_scrollbar = true
//! follow_tail = false
//! scroll_step = 1
//! ```
//!
//! ```rust,ignore
//! let config = ListConfig::from_toml_file("vlist.toml")?.into_validated()?;
//! let spec = config.to_window_spec(messages.len(), f64::from(area.height))?;
//! ```
//!
//! Missing keys take the defaults below, which match the in-code constants,
//! so an empty file is a valid configuration.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vlist_core::{DEFAULT_OVERSCAN, WindowError, WindowSpec};

/// Tunables for one virtualized list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListConfig {
    /// Rows per item.
    pub item_height: u16,
    /// Extra items materialized above and below the viewport.
    pub overscan: usize,
    /// Draw a scrollbar when the content overflows.
    pub show_scrollbar: bool,
    /// Stay pinned to the last item as items are appended.
    pub follow_tail: bool,
    /// Rows moved per wheel notch or arrow key.
    pub scroll_step: u16,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            item_height: 3,
            overscan: DEFAULT_OVERSCAN,
            show_scrollbar: true,
            follow_tail: false,
            scroll_step: 1,
        }
    }
}

impl ListConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ListConfigError> {
        toml::from_str(s).map_err(ListConfigError::Toml)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ListConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ListConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ListConfigError> {
        serde_json::from_str(s).map_err(ListConfigError::Json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ListConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ListConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Every problem with the values, in field order. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.item_height == 0 {
            errors.push("item_height must be > 0".into());
        }
        if self.scroll_step == 0 {
            errors.push("scroll_step must be > 0".into());
        }
        if self.overscan > 1_000 {
            errors.push(format!("overscan must be <= 1000, got {}", self.overscan));
        }
        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing.
    pub fn into_validated(self) -> Result<Self, ListConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ListConfigError::Validation(errors))
        }
    }

    /// Window inputs for `item_count` items in a viewport of
    /// `viewport_height` rows.
    pub fn to_window_spec(
        &self,
        item_count: usize,
        viewport_height: f64,
    ) -> Result<WindowSpec, WindowError> {
        Ok(
            WindowSpec::new(item_count, f64::from(self.item_height), viewport_height)?
                .with_overscan(self.overscan),
        )
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ListConfigError> {
        toml::to_string(self).map_err(ListConfigError::TomlSer)
    }
}

/// Failure to load a [`ListConfig`].
#[derive(Debug)]
pub enum ListConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    TomlSer(toml::ser::Error),
    Json(serde_json::Error),
    Validation(Vec<String>),
}

impl fmt::Display for ListConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::TomlSer(e) => write!(f, "TOML serialize error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ListConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::TomlSer(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
