//! The tree mirror: the host's lazily-streamed node graph.
//!
//! A [`TreeMirror`] is the single source of truth for structure, labels and
//! drag serialization. The view never stores nodes beyond one operation; it
//! asks the mirror again on every refresh.
//!
//! # Example
//!
//! ```
//! use mirror_view::mirror::{DragPayload, NodeIcon, TreeMirror};
//! use mirror_view_core::CallbackResult;
//!
//! struct Flat(Vec<String>);
//!
//! impl TreeMirror for Flat {
//!     type Node = String;
//!
//!     fn top(&self) -> Vec<String> {
//!         self.0.clone()
//!     }
//!
//!     fn children(&self, _node: &String) -> Vec<String> {
//!         Vec::new()
//!     }
//!
//!     fn is_leaf(&self, _node: &String) -> bool {
//!         true
//!     }
//!
//!     fn text(&self, node: &String) -> String {
//!         node.clone()
//!     }
//!
//!     fn icon(&self, _node: &String) -> NodeIcon {
//!         NodeIcon::File
//!     }
//!
//!     fn data_type(&self) -> &str {
//!         "text"
//!     }
//!
//!     fn to_data(&self, nodes: &[String]) -> CallbackResult<DragPayload> {
//!         Ok(DragPayload::from_text(nodes.join("\n")))
//!     }
//!
//!     fn from_data(&self, payload: &DragPayload) -> CallbackResult<Vec<String>> {
//!         let text = payload.text().ok_or("expected text")?;
//!         Ok(text.lines().map(String::from).collect())
//!     }
//! }
//! ```

mod payload;

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use mirror_view_core::CallbackResult;

use crate::error::TreeViewError;

pub use payload::{DragPayload, DropAction};

/// How a mirror serializes dragged nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A list of path-like strings, transferred like files.
    File,
    /// One opaque text blob.
    Text,
}

impl DataType {
    /// The name a mirror uses to declare this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = TreeViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "text" => Ok(Self::Text),
            other => Err(TreeViewError::unknown_data_type(other)),
        }
    }
}

/// The icon a node asks for.
///
/// Only [`NodeIcon::Directory`] and [`NodeIcon::File`] map to an image;
/// anything else is drawn without an icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NodeIcon {
    /// No icon.
    #[default]
    None,
    /// A folder-like node.
    Directory,
    /// A file-like node.
    File,
    /// A mirror-specific icon name the view does not know.
    Other(String),
}

/// A lazy, virtualized node graph exposed to the view.
///
/// Nodes are opaque handles. They must be cheap to clone and compare: the
/// view keys its row lookup tables by node equality and rebuilds them on
/// every refresh.
pub trait TreeMirror: Send + Sync + 'static {
    /// Handle to one node of the mirror.
    type Node: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// The root nodes.
    fn top(&self) -> Vec<Self::Node>;

    /// Children of `node`, produced on demand.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Returns `true` if `node` has at least one child.
    ///
    /// The default materializes one level of children. Override when that
    /// is expensive.
    fn has_children(&self, node: &Self::Node) -> bool {
        !self.children(node).is_empty()
    }

    /// Returns `true` if `node` can never have children.
    fn is_leaf(&self, node: &Self::Node) -> bool;

    /// Display text for `node`.
    fn text(&self, node: &Self::Node) -> String;

    /// Icon for `node`.
    fn icon(&self, _node: &Self::Node) -> NodeIcon {
        NodeIcon::None
    }

    /// The declared drag payload type, `"file"` or `"text"`.
    fn data_type(&self) -> &str;

    /// Serializes `nodes` for a drag.
    fn to_data(&self, nodes: &[Self::Node]) -> CallbackResult<DragPayload>;

    /// Reconstructs nodes from a dropped payload.
    ///
    /// The result need not be identical to the nodes originally dragged,
    /// only logically equivalent.
    fn from_data(&self, payload: &DragPayload) -> CallbackResult<Vec<Self::Node>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_parse() {
        assert_eq!("file".parse::<DataType>().ok(), Some(DataType::File));
        assert_eq!("text".parse::<DataType>().ok(), Some(DataType::Text));
        assert!(matches!(
            "image".parse::<DataType>(),
            Err(TreeViewError::UnknownDataType(name)) if name == "image"
        ));
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::File.to_string(), "file");
        assert_eq!(DataType::Text.to_string(), "text");
    }

    #[test]
    fn test_node_icon_default() {
        assert_eq!(NodeIcon::default(), NodeIcon::None);
    }
}
