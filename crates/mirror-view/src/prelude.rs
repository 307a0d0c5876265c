//! Prelude module for mirror-view.
//!
//! ```ignore
//! use mirror_view::prelude::*;
//! ```

// ============================================================================
// Core
// ============================================================================

pub use mirror_view_core::{CallbackError, CallbackResult, Signal};

// ============================================================================
// Model side
// ============================================================================

pub use crate::config::{DragStartFailure, TreeViewConfig};
pub use crate::controller::{DragController, DropPosition, TreeController};
pub use crate::mirror::{DataType, DragPayload, NodeIcon, TreeMirror};
pub use crate::model::TreeModel;

// ============================================================================
// View side
// ============================================================================

pub use crate::view::{
    DropZone, EditorHandle, EditorKey, MouseButton, RowLabel, TreeViewCore, TreeViewFactory,
    TreeWidget,
};
