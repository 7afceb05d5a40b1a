//! Grid behavior settings
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! row_advance = "placeholder_only"
//! advance_on_empty = false
//! focus_loss = "commit"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the edit cursor goes after the last chained column is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAdvance {
    /// First chained column of the following row, placeholder included
    #[default]
    NextRow,
    /// Only when the following row is the placeholder
    PlaceholderOnly,
    Never,
}

/// What losing focus does to an open editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusLoss {
    #[default]
    Commit,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub row_advance: RowAdvance,
    /// Advance even when the committed text is empty
    pub advance_on_empty: bool,
    pub focus_loss: FocusLoss,
}

impl GridSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse grid settings")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grid settings from {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}
