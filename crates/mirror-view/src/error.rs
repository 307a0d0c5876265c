//! Error types for the tree view.
//!
//! Only configuration problems surface as errors. Controller failures are
//! caught and logged at the callback boundary, and lookup misses are normal
//! outcomes, so neither appears here.

use std::path::PathBuf;

use crate::mirror::DataType;

/// Result type alias for tree view operations.
pub type Result<T> = std::result::Result<T, TreeViewError>;

/// Errors that can occur while constructing or configuring a tree view.
#[derive(Debug, thiserror::Error)]
pub enum TreeViewError {
    /// The mirror declared a data type the view cannot transfer.
    #[error("unknown tree data_type '{0}'")]
    UnknownDataType(String),

    /// A payload did not have the shape its data type requires.
    #[error("payload does not match data type {expected}: got {found}")]
    PayloadMismatch {
        expected: DataType,
        found: &'static str,
    },

    /// The configuration text could not be parsed.
    #[error("invalid tree view configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize tree view configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An icon resource could not be loaded.
    #[error("failed to load icon '{path}': {source}")]
    Icon {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl TreeViewError {
    /// Create an unknown data type error.
    pub fn unknown_data_type(declared: impl Into<String>) -> Self {
        Self::UnknownDataType(declared.into())
    }

    /// Create a configuration I/O error.
    pub fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    /// Create an icon loading error.
    pub fn icon(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Icon {
            path: path.into(),
            source,
        }
    }
}
