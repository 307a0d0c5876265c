//! Tree view configuration.
//!
//! Configuration is plain TOML. Every key is optional:
//!
//! ```toml
//! refresh_on_refocus = true
//! drag_start_failure = "fail_closed"
//! close_editor_on_refresh = true
//! icon_dir = "/usr/share/mirror-view/icons"
//! ```

use std::path::{Path, PathBuf};

use mirror_view_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeViewError};

/// What to do when a drag controller's `drag_start` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragStartFailure {
    /// Deny the drag.
    #[default]
    FailClosed,
    /// Let the drag proceed anyway.
    FailOpen,
}

/// Settings shared by every view a factory builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeViewConfig {
    /// Refresh the rows when the host window regains focus.
    pub refresh_on_refocus: bool,
    /// Policy for a failing drag-start callback.
    pub drag_start_failure: DragStartFailure,
    /// Cancel an open inline editor before a refresh rebuilds the rows.
    pub close_editor_on_refresh: bool,
    /// Directory holding `darwin-folder.png` and `darwin-file.png`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_dir: Option<PathBuf>,
}

impl Default for TreeViewConfig {
    fn default() -> Self {
        Self {
            refresh_on_refocus: true,
            drag_start_failure: DragStartFailure::FailClosed,
            close_editor_on_refresh: true,
            icon_dir: None,
        }
    }
}

impl TreeViewConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TreeViewError::config_io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), ?config, "configuration loaded");
        Ok(config)
    }

    /// Serializes the configuration to TOML text.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Sets the drag-start failure policy.
    pub fn with_drag_start_failure(mut self, policy: DragStartFailure) -> Self {
        self.drag_start_failure = policy;
        self
    }

    /// Sets whether refocusing the window refreshes the rows.
    pub fn with_refresh_on_refocus(mut self, enabled: bool) -> Self {
        self.refresh_on_refocus = enabled;
        self
    }

    /// Sets whether a refresh cancels an open inline editor.
    pub fn with_close_editor_on_refresh(mut self, enabled: bool) -> Self {
        self.close_editor_on_refresh = enabled;
        self
    }

    /// Sets the icon directory.
    pub fn with_icon_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.icon_dir = Some(dir.into());
        self
    }
}
