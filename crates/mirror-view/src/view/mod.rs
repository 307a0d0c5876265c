//! The view side: bridges, sessions and the tree view itself.
//!
//! # Components
//!
//! - [`ContentBridge`] / [`LabelBridge`]: read-only projections of the mirror
//! - [`RowTable`]: the visible rows and element/row lookups
//! - [`DragCoordinator`]: the single drag session
//! - [`DropResolver`]: drop position resolution and delegation
//! - [`EditSession`]: the single inline editor
//! - [`IconRegistry`]: shared, reference-counted icons
//! - [`TreeViewCore`]: ties the above to a [`TreeWidget`]
//! - [`TreeViewFactory`]: builds views sharing configuration and icons

mod content;
mod drag;
mod drop;
mod edit;
mod factory;
mod icons;
mod label;
mod rows;
mod tree_view;
mod widget;

pub use content::ContentBridge;
pub use drag::{DragCoordinator, DragSession, DragState};
pub use drop::{DropResolver, DropZone};
pub use edit::{EditSession, EditorKey, clamp_selection};
pub use factory::TreeViewFactory;
pub use icons::{FileIconLoader, Icon, IconKind, IconLease, IconLoader, IconRegistry};
pub use label::{LabelBridge, NodeLabel};
pub use rows::{Row, RowTable};
pub use tree_view::{DROP_ACTIONS, TreeViewCore};
pub use widget::{DndRegistration, EditorHandle, MouseButton, RowLabel, TreeWidget};
