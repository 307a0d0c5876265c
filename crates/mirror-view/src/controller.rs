//! Tree controllers: the optional policy attached to a model.
//!
//! A [`TreeController`] is a bundle of optional capabilities. Each one that
//! is absent turns the matching gesture into a no-op; which ones are present
//! is recorded once, in [`ControllerCapabilities`], when the controller is
//! attached to a [`TreeModel`].
//!
//! Every capability is host code and may fail. The view calls them through
//! [`mirror_view_core::guarded`], so an `Err` or a panic is logged and
//! turned into the least surprising outcome for the widget.

use std::fmt;
use std::sync::Arc;

use mirror_view_core::{CallbackResult, guarded};

use crate::mirror::TreeMirror;
use crate::model::TreeModel;

/// Where a drop lands relative to its target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropPosition {
    /// Insert as the previous sibling of the target.
    Before,
    /// Insert as the next sibling of the target.
    After,
    /// Drop into the target.
    Onto,
}

impl fmt::Display for DropPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Onto => "onto",
        })
    }
}

/// Drag and drop policy.
///
/// `target` is `None` when the drop lands outside every row.
pub trait DragController<N>: Send + Sync {
    /// Whether drops may land between rows.
    ///
    /// When `false`, every drop is resolved to [`DropPosition::Onto`].
    fn reorderable(&self) -> CallbackResult<bool> {
        Ok(false)
    }

    /// Called when a drag of `nodes` begins. An error vetoes the drag unless
    /// the view is configured to fail open.
    fn drag_start(&self, _nodes: &[N]) -> CallbackResult<()> {
        Ok(())
    }

    /// Whether `nodes` may be dropped at `position` relative to `target`.
    fn can_drop(
        &self,
        nodes: &[N],
        target: Option<&N>,
        position: DropPosition,
    ) -> CallbackResult<bool>;

    /// Performs the drop.
    fn do_drop(
        &self,
        nodes: &[N],
        target: Option<&N>,
        position: DropPosition,
    ) -> CallbackResult<()>;
}

type EditedFn<M> =
    Box<dyn Fn(&TreeModel<M>, &<M as TreeMirror>::Node, &str) -> CallbackResult<()> + Send + Sync>;
type RightClickFn<M> =
    Box<dyn Fn(&TreeModel<M>, Option<&<M as TreeMirror>::Node>) -> CallbackResult<()> + Send + Sync>;
type ActivatedFn<M> =
    Box<dyn Fn(&TreeModel<M>, &<M as TreeMirror>::Node) -> CallbackResult<()> + Send + Sync>;

/// Which optional capabilities a controller supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerCapabilities {
    /// A drag controller is present.
    pub drag: bool,
    /// Inline edits are committed to the controller.
    pub edited: bool,
    /// Right clicks are forwarded.
    pub right_click: bool,
    /// The open gesture is forwarded.
    pub activated: bool,
}

/// A set of optional callbacks that own all domain mutation for a tree.
///
/// ```
/// # use mirror_view::controller::TreeController;
/// # use mirror_view::mirror::{DragPayload, TreeMirror};
/// # use mirror_view_core::CallbackResult;
/// # struct Names;
/// # impl TreeMirror for Names {
/// #     type Node = String;
/// #     fn top(&self) -> Vec<String> { vec![] }
/// #     fn children(&self, _: &String) -> Vec<String> { vec![] }
/// #     fn is_leaf(&self, _: &String) -> bool { true }
/// #     fn text(&self, n: &String) -> String { n.clone() }
/// #     fn data_type(&self) -> &str { "text" }
/// #     fn to_data(&self, n: &[String]) -> CallbackResult<DragPayload> { Ok(DragPayload::from_text(n.join(","))) }
/// #     fn from_data(&self, _: &DragPayload) -> CallbackResult<Vec<String>> { Ok(vec![]) }
/// # }
/// let controller = TreeController::<Names>::new()
///     .on_activated(|_model, node| {
///         println!("open {node}");
///         Ok(())
///     });
///
/// let caps = controller.capabilities();
/// assert!(caps.activated);
/// assert!(!caps.edited);
/// ```
pub struct TreeController<M: TreeMirror> {
    drag: Option<Arc<dyn DragController<M::Node>>>,
    edited: Option<EditedFn<M>>,
    right_click: Option<RightClickFn<M>>,
    activated: Option<ActivatedFn<M>>,
}

impl<M: TreeMirror> Default for TreeController<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TreeMirror> TreeController<M> {
    /// Creates a controller with no capabilities.
    pub fn new() -> Self {
        Self {
            drag: None,
            edited: None,
            right_click: None,
            activated: None,
        }
    }

    /// Sets the drag and drop policy.
    pub fn with_drag(mut self, drag: Arc<dyn DragController<M::Node>>) -> Self {
        self.drag = Some(drag);
        self
    }

    /// Sets the inline-edit commit callback.
    pub fn on_edited<F>(mut self, f: F) -> Self
    where
        F: Fn(&TreeModel<M>, &M::Node, &str) -> CallbackResult<()> + Send + Sync + 'static,
    {
        self.edited = Some(Box::new(f));
        self
    }

    /// Sets the right-click callback. It receives `None` when the click
    /// missed every row.
    pub fn on_right_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&TreeModel<M>, Option<&M::Node>) -> CallbackResult<()> + Send + Sync + 'static,
    {
        self.right_click = Some(Box::new(f));
        self
    }

    /// Sets the open-gesture callback.
    pub fn on_activated<F>(mut self, f: F) -> Self
    where
        F: Fn(&TreeModel<M>, &M::Node) -> CallbackResult<()> + Send + Sync + 'static,
    {
        self.activated = Some(Box::new(f));
        self
    }

    /// Reports which capabilities are present.
    pub fn capabilities(&self) -> ControllerCapabilities {
        ControllerCapabilities {
            drag: self.drag.is_some(),
            edited: self.edited.is_some(),
            right_click: self.right_click.is_some(),
            activated: self.activated.is_some(),
        }
    }

    /// The drag policy, if any.
    pub fn drag(&self) -> Option<&Arc<dyn DragController<M::Node>>> {
        self.drag.as_ref()
    }

    /// Commits an edit. Returns `true` if the callback ran and succeeded.
    pub(crate) fn edited(&self, model: &TreeModel<M>, node: &M::Node, text: &str) -> bool {
        match &self.edited {
            Some(f) => guarded("edited", || f(model, node, text)).is_some(),
            None => false,
        }
    }

    /// Forwards a right click. Returns `true` if the callback ran and
    /// succeeded.
    pub(crate) fn right_click(&self, model: &TreeModel<M>, node: Option<&M::Node>) -> bool {
        match &self.right_click {
            Some(f) => guarded("right_click", || f(model, node)).is_some(),
            None => false,
        }
    }

    /// Forwards the open gesture. Returns `true` if the callback ran and
    /// succeeded.
    pub(crate) fn activated(&self, model: &TreeModel<M>, node: &M::Node) -> bool {
        match &self.activated {
            Some(f) => guarded("activated", || f(model, node)).is_some(),
            None => false,
        }
    }
}

impl<M: TreeMirror> fmt::Debug for TreeController<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeController")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}
