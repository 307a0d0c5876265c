//! The tree view: keeps a widget in sync with a [`TreeModel`].
//!
//! [`TreeViewCore`] owns the rows, the drag and edit sessions and the
//! widget. It reacts to two kinds of input:
//!
//! - **Model events** (`refresh`, `edit_element`, `expand_element`,
//!   `select_element`), queued by the model's signals and applied by
//!   [`TreeViewCore::dispatch_model_events`].
//! - **Widget gestures** (clicks, drags, drops, editor keys), reported by
//!   the host through the gesture methods.
//!
//! Every gesture drains the model event queue before returning, so a
//! controller callback may emit model events freely: they are applied once
//! the gesture itself is done.
//!
//! # Example
//!
//! ```ignore
//! let factory = TreeViewFactory::new(TreeViewConfig::default());
//! let model = Arc::new(TreeModel::new(project).with_controller(controller));
//! let mut view = factory.create(Arc::clone(&model), widget)?;
//!
//! // Host event loop:
//! view.double_click(row);
//! model.refresh();
//! view.dispatch_model_events();
//! ```

use std::fmt;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use mirror_view_core::logging::{span_names, targets};

use super::content::ContentBridge;
use super::drag::{DragCoordinator, DragSession};
use super::drop::{DropResolver, DropZone};
use super::edit::{EditSession, EditorKey};
use super::icons::{IconLease, IconRegistry};
use super::label::{LabelBridge, NodeLabel};
use super::rows::RowTable;
use super::widget::{DndRegistration, MouseButton, RowLabel, TreeWidget};
use crate::config::TreeViewConfig;
use crate::error::Result;
use crate::mirror::{DataType, DragPayload, DropAction, TreeMirror};
use crate::model::{ModelEvent, ModelSubscription, TreeModel};

/// Operations offered to the platform for drops.
pub const DROP_ACTIONS: DropAction = DropAction::COPY.union(DropAction::MOVE);

/// Keeps one [`TreeWidget`] in sync with one [`TreeModel`].
pub struct TreeViewCore<M: TreeMirror, W: TreeWidget> {
    model: Arc<TreeModel<M>>,
    widget: W,
    config: TreeViewConfig,
    content: ContentBridge<M>,
    labels: LabelBridge<M>,
    rows: RowTable<M::Node>,
    drag: DragCoordinator<M::Node>,
    drop: DropResolver<M::Node>,
    edit: EditSession<M::Node>,
    events: Receiver<ModelEvent<M::Node>>,
    subscription: Option<ModelSubscription<M::Node>>,
    icons: IconLease,
    closed: bool,
}

impl<M: TreeMirror, W: TreeWidget> TreeViewCore<M, W> {
    /// Builds a view over `model`, drawing into `widget`.
    ///
    /// Fails if the mirror declares a data type the view cannot transfer.
    /// On success the rows are built and pushed to the widget.
    pub fn new(
        model: Arc<TreeModel<M>>,
        mut widget: W,
        config: TreeViewConfig,
        icons: &Arc<IconRegistry>,
    ) -> Result<Self> {
        let data_type: DataType = model.mirror().data_type().parse()?;
        let mirror = model.shared_mirror();
        let policy = model.controller().and_then(|c| c.drag()).cloned();

        let drop = DropResolver::new(policy);
        if drop.has_policy() {
            widget.enable_drag_and_drop(DndRegistration {
                data_type,
                actions: DROP_ACTIONS,
            });
            widget.set_drop_feedback(drop.reorderable());
        }

        let (tx, events) = crossbeam_channel::unbounded();
        let subscription = model.subscribe(tx);

        let mut view = Self {
            content: ContentBridge::new(Arc::clone(&mirror)),
            labels: LabelBridge::new(mirror, Arc::clone(icons)),
            rows: RowTable::new(),
            drag: DragCoordinator::new(data_type, config.drag_start_failure),
            drop,
            edit: EditSession::new(),
            events,
            subscription: Some(subscription),
            icons: icons.attach(),
            closed: false,
            model,
            widget,
            config,
        };
        tracing::debug!(target: targets::VIEW, %data_type, "tree view created");
        view.rebuild();
        Ok(view)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The model this view displays.
    pub fn model(&self) -> &Arc<TreeModel<M>> {
        &self.model
    }

    /// The embedded widget.
    pub fn control(&self) -> &W {
        &self.widget
    }

    /// The embedded widget, mutably.
    pub fn control_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    /// The configuration this view was built with.
    pub fn config(&self) -> &TreeViewConfig {
        &self.config
    }

    /// The visible rows.
    pub fn rows(&self) -> &RowTable<M::Node> {
        &self.rows
    }

    /// The inline edit session.
    pub fn edit_session(&self) -> &EditSession<M::Node> {
        &self.edit
    }

    /// The active drag, if any.
    pub fn drag_session(&self) -> Option<&DragSession<M::Node>> {
        self.drag.session()
    }

    /// Selected nodes in row order.
    pub fn selection(&self) -> &[M::Node] {
        self.rows.selection()
    }

    /// The node drawn at `row`.
    pub fn element_for_row(&self, row: usize) -> Option<&M::Node> {
        self.rows.node(row)
    }

    /// The row drawing `node`, if it is visible.
    pub fn row_for_element(&self, node: &M::Node) -> Option<usize> {
        self.rows.find(node)
    }

    /// Returns true once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // =========================================================================
    // Model events
    // =========================================================================

    /// Applies every queued model event. Returns how many were applied.
    pub fn dispatch_model_events(&mut self) -> usize {
        let span = tracing::trace_span!(target: targets::VIEW, span_names::DISPATCH);
        let _enter = span.enter();

        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            if self.closed {
                break;
            }
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: ModelEvent<M::Node>) {
        match event {
            ModelEvent::Refresh => self.refresh(),
            ModelEvent::Edit(req) => self.edit_element(&req.node, req.from, req.to),
            ModelEvent::Expand(node) => self.expand_element(&node),
            ModelEvent::Select(node) => self.select_element(&node),
        }
    }

    /// Rebuilds every row from the mirror.
    ///
    /// An open editor is cancelled first unless the view is configured to
    /// keep it; a kept editor still closes if its node changes row.
    /// Selection and expansion are kept for nodes still present.
    #[tracing::instrument(skip(self), target = "mirror_view::view", level = "debug")]
    pub fn refresh(&mut self) {
        if self.closed {
            return;
        }
        if self.config.close_editor_on_refresh && self.edit.cancel(&mut self.widget) {
            tracing::debug!(target: targets::VIEW, "editor closed by refresh");
        }
        self.rebuild();
    }

    /// Expands `node` one level if it is visible.
    pub fn expand_element(&mut self, node: &M::Node) {
        match self.rows.find(node) {
            Some(row) => {
                self.expand_row(row);
            }
            None => tracing::debug!(target: targets::VIEW, ?node, "expand: node not rendered"),
        }
    }

    /// Selects `node` if it is visible.
    pub fn select_element(&mut self, node: &M::Node) {
        if self.rows.select(node) {
            self.widget.selection_changed(&self.rows.selected_rows());
        } else {
            tracing::debug!(target: targets::VIEW, ?node, "select: node not rendered");
        }
    }

    /// Opens the inline editor on `node` if it is visible.
    ///
    /// The editor is seeded with the node's text; `from` and `to` select a
    /// character range and default to the whole text.
    pub fn edit_element(&mut self, node: &M::Node, from: Option<usize>, to: Option<usize>) {
        let Some(row) = self.rows.find(node) else {
            tracing::warn!(target: targets::EDIT, ?node, "edit: node not rendered, request dropped");
            return;
        };
        let text = self.labels.text(node);
        self.edit
            .open(&mut self.widget, node.clone(), row, text, from, to);
    }

    // =========================================================================
    // Row gestures
    // =========================================================================

    /// Expands the node at `row`. Returns true if anything changed.
    pub fn expand_row(&mut self, row: usize) -> bool {
        let Some(r) = self.rows.row(row) else {
            return false;
        };
        if !r.has_children {
            return false;
        }
        let node = r.node.clone();
        if self.rows.expand(&node) {
            self.rebuild();
            true
        } else {
            false
        }
    }

    /// Collapses the node at `row`. Returns true if anything changed.
    pub fn collapse_row(&mut self, row: usize) -> bool {
        let Some(node) = self.rows.node(row).cloned() else {
            return false;
        };
        if self.rows.collapse(&node) {
            self.rebuild();
            true
        } else {
            false
        }
    }

    /// Toggles the node at `row`. Returns true if anything changed.
    pub fn toggle_row(&mut self, row: usize) -> bool {
        match self.rows.row(row) {
            Some(r) if r.expanded => self.collapse_row(row),
            Some(_) => self.expand_row(row),
            None => false,
        }
    }

    /// Records the selection the user made in the widget.
    pub fn set_selected_rows(&mut self, rows: &[usize]) {
        if self.rows.set_selected_rows(rows) {
            tracing::trace!(target: targets::VIEW, selected = ?self.rows.selection(), "selection changed");
        }
    }

    /// Handles a mouse press. Only the secondary button does anything: it
    /// forwards the node under the pointer (or none) to the controller.
    pub fn mouse_down(&mut self, button: MouseButton, row: Option<usize>) {
        if button != MouseButton::Right {
            return;
        }
        if let Some(controller) = self.model.controller()
            && self.model.capabilities().right_click
        {
            let node = row.and_then(|r| self.rows.node(r));
            controller.right_click(&self.model, node);
        }
        self.dispatch_model_events();
    }

    /// Handles a double click on `row`: toggles expansion of non-leaf
    /// nodes and ignores leaves.
    pub fn double_click(&mut self, row: usize) {
        let Some(node) = self.rows.node(row) else {
            return;
        };
        if self.model.mirror().is_leaf(node) {
            return;
        }
        self.toggle_row(row);
        self.dispatch_model_events();
    }

    /// Handles the open gesture: forwards the first selected node to the
    /// controller's `activated` callback.
    pub fn open(&mut self) {
        if let Some(controller) = self.model.controller()
            && self.model.capabilities().activated
        {
            match self.rows.selection().first() {
                Some(node) => {
                    controller.activated(&self.model, node);
                }
                None => tracing::debug!(target: targets::VIEW, "open: nothing selected"),
            }
        }
        self.dispatch_model_events();
    }

    /// Handles the host window regaining focus.
    pub fn window_refocused(&mut self) {
        if self.config.refresh_on_refocus {
            self.refresh();
        }
    }

    // =========================================================================
    // Drag and drop
    // =========================================================================

    /// Starts dragging the current selection. Returns whether the drag is
    /// allowed.
    pub fn drag_start(&mut self) -> bool {
        let policy = self
            .model
            .controller()
            .and_then(|c| c.drag())
            .map(|p| &**p);
        let allowed = self.drag.start(policy, self.rows.selection());
        self.dispatch_model_events();
        allowed
    }

    /// Produces the payload for the active drag.
    pub fn drag_set_data(&mut self) -> Option<DragPayload> {
        let payload = self.drag.set_data(self.model.mirror());
        self.dispatch_model_events();
        payload
    }

    /// Ends the active drag, whatever its outcome.
    pub fn drag_finished(&mut self) {
        self.drag.finish();
        self.dispatch_model_events();
    }

    /// Decides whether the active drag may drop at `zone` of `row`.
    ///
    /// `row` is `None` (or `zone` is [`DropZone::Outside`]) when the pointer
    /// is not over any row.
    pub fn validate_drop(&mut self, row: Option<usize>, zone: DropZone) -> bool {
        let target = self.drop_target(row, zone);
        let allowed = self.drop.validate(self.drag.dragged(), target, zone);
        self.dispatch_model_events();
        allowed
    }

    /// Performs a drop of `payload` at `zone` of `row`. Returns false if the
    /// drop was rejected or failed.
    pub fn perform_drop(&mut self, payload: &DragPayload, row: Option<usize>, zone: DropZone) -> bool {
        let target = self.drop_target(row, zone);
        let done = self
            .drop
            .execute(self.model.mirror(), payload, target, zone);
        self.dispatch_model_events();
        done
    }

    fn drop_target(&self, row: Option<usize>, zone: DropZone) -> Option<&M::Node> {
        if zone == DropZone::Outside {
            return None;
        }
        row.and_then(|r| self.rows.node(r))
    }

    // =========================================================================
    // Inline editor
    // =========================================================================

    /// Records the editor's current text.
    pub fn editor_text_changed(&mut self, text: &str) {
        self.edit.set_text(text);
    }

    /// Handles a key pressed in the editor.
    pub fn editor_key(&mut self, key: EditorKey) {
        match key {
            EditorKey::Return => self.commit_edit(),
            EditorKey::Escape => self.cancel_edit(),
            EditorKey::Other => {}
        }
    }

    /// Handles the editor losing focus; commits like Return.
    pub fn editor_focus_lost(&mut self) {
        self.commit_edit();
    }

    /// Closes the editor and hands the text to the controller's `edited`
    /// callback, if it has one. The overlay is gone before the callback
    /// runs.
    pub fn commit_edit(&mut self) {
        let Some((node, text)) = self.edit.commit(&mut self.widget) else {
            return;
        };
        match self.model.controller() {
            Some(controller) if self.model.capabilities().edited => {
                controller.edited(&self.model, &node, &text);
            }
            _ => tracing::debug!(target: targets::EDIT, ?node, "no edited callback, text discarded"),
        }
        self.dispatch_model_events();
    }

    /// Closes the editor without calling the controller.
    pub fn cancel_edit(&mut self) {
        self.edit.cancel(&mut self.widget);
        self.dispatch_model_events();
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Releases the widget and this view's hold on shared icons. Calling it
    /// again has no effect. Dropping the view closes it.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.edit.cancel(&mut self.widget);
        self.drag.finish();
        self.subscription = None;
        self.rows.clear();
        self.widget.dispose();
        self.icons.release();
        self.closed = true;
        tracing::debug!(target: targets::VIEW, "tree view closed");
    }

    fn rebuild(&mut self) {
        let _span = tracing::debug_span!(target: targets::VIEW, span_names::REFRESH).entered();
        self.rows.rebuild(&self.content);

        // The overlay is anchored to a row index; it cannot follow its node.
        if let Some(node) = self.edit.node()
            && self.rows.find(node) != self.edit.row()
        {
            tracing::debug!(target: targets::EDIT, ?node, "edited row moved, editor closed");
            self.edit.cancel(&mut self.widget);
        }

        let labels: Vec<RowLabel> = self
            .rows
            .rows()
            .iter()
            .map(|row| {
                let NodeLabel { text, icon } = self.labels.label(&row.node);
                RowLabel {
                    depth: row.depth,
                    text,
                    icon,
                    has_children: row.has_children,
                    expanded: row.expanded,
                }
            })
            .collect();

        self.widget.rows_changed(&labels);
        self.widget.selection_changed(&self.rows.selected_rows());
    }
}

impl<M: TreeMirror, W: TreeWidget> Drop for TreeViewCore<M, W> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<M: TreeMirror, W: TreeWidget> fmt::Debug for TreeViewCore<M, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeViewCore")
            .field("rows", &self.rows.len())
            .field("drag", &self.drag)
            .field("edit", &self.edit)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
