//! mirror-view - keeps a lazily-streamed tree model in sync with a tree widget.
//!
//! The host supplies three things:
//!
//! - a [`TreeMirror`](mirror::TreeMirror): the node graph, produced on demand
//! - an optional [`TreeController`](controller::TreeController): drag and
//!   drop policy, inline-edit commits, right clicks and activation
//! - a [`TreeWidget`](view::TreeWidget): the toolkit widget that draws rows
//!
//! A [`TreeViewCore`](view::TreeViewCore) ties them together. The widget
//! never owns domain state; all mutation goes through the controller, and a
//! failing controller callback is logged without disturbing the widget.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mirror_view::prelude::*;
//!
//! let factory = TreeViewFactory::new(TreeViewConfig::load("tree.toml")?);
//! let model = Arc::new(TreeModel::new(ProjectTree::open(".")).with_controller(
//!     TreeController::new().on_activated(|_model, node| open_file(node)),
//! ));
//! let mut view = factory.create(Arc::clone(&model), widget)?;
//!
//! view.set_selected_rows(&[0]);
//! view.open();
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod mirror;
pub mod model;
pub mod prelude;
pub mod view;

pub use error::{Result, TreeViewError};
