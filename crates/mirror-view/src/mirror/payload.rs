//! Drag payloads and drop actions.

use std::path::{Path, PathBuf};

use super::DataType;
use crate::error::{Result, TreeViewError};

/// Actions a drop target may perform with the dragged data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropAction(u8);

impl DropAction {
    /// Copy the data.
    pub const COPY: Self = Self(1 << 0);
    /// Move the data.
    pub const MOVE: Self = Self(1 << 1);

    /// Combines two action sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Serialized form of a set of dragged nodes.
///
/// The shape follows the mirror's [`DataType`]: `file` mirrors transfer a
/// list of paths, `text` mirrors transfer one string whose encoding is up to
/// the mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    /// Path-like strings, one per node.
    Files(Vec<PathBuf>),
    /// An opaque string.
    Text(String),
}

impl DragPayload {
    /// Creates a file payload from a list of paths.
    pub fn from_paths<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self::Files(paths.into_iter().map(Into::into).collect())
    }

    /// Creates a text payload.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The paths, if this is a file payload.
    pub fn paths(&self) -> Option<&[PathBuf]> {
        match self {
            Self::Files(paths) => Some(paths),
            Self::Text(_) => None,
        }
    }

    /// The text, if this is a text payload.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Files(_) => None,
        }
    }

    /// The data type this payload's shape corresponds to.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Files(_) => DataType::File,
            Self::Text(_) => DataType::Text,
        }
    }

    /// Checks that the payload has the shape `expected` requires.
    pub fn check(&self, expected: DataType) -> Result<()> {
        let found = self.data_type();
        if found == expected {
            Ok(())
        } else {
            Err(TreeViewError::PayloadMismatch {
                expected,
                found: found.as_str(),
            })
        }
    }

    /// Path strings as handed to the platform, lossily converted.
    pub fn path_strings(&self) -> Vec<String> {
        self.paths()
            .unwrap_or_default()
            .iter()
            .map(|p| Path::to_string_lossy(p).into_owned())
            .collect()
    }
}

static_assertions::assert_impl_all!(DragPayload: Send, Sync);
static_assertions::assert_impl_all!(DropAction: Send, Sync, Copy);
