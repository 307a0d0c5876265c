//! The tree model: a mirror, an optional controller and the signals the
//! model uses to drive its views.

use std::fmt;
use std::sync::Arc;

use crossbeam_channel::Sender;
use mirror_view_core::{ConnectionGuard, Signal};

use crate::controller::{ControllerCapabilities, TreeController};
use crate::mirror::TreeMirror;

/// A request to open the inline editor on a node.
///
/// `from` and `to` select a character range of the node's text. Missing
/// bounds default to the start and end of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest<N> {
    /// Node to edit.
    pub node: N,
    /// Selection start.
    pub from: Option<usize>,
    /// Selection end.
    pub to: Option<usize>,
}

/// Signals a model emits towards its views.
pub struct TreeSignals<N> {
    /// The mirror changed; views should rebuild their rows.
    pub refresh: Signal<()>,
    /// Open an inline editor on a node.
    pub edit_element: Signal<EditRequest<N>>,
    /// Expand a node by one level.
    pub expand_element: Signal<N>,
    /// Select a node.
    pub select_element: Signal<N>,
}

impl<N: Clone + Send + 'static> TreeSignals<N> {
    fn new() -> Self {
        Self {
            refresh: Signal::new(),
            edit_element: Signal::new(),
            expand_element: Signal::new(),
            select_element: Signal::new(),
        }
    }
}

/// A model event as delivered to a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent<N> {
    /// See [`TreeSignals::refresh`].
    Refresh,
    /// See [`TreeSignals::edit_element`].
    Edit(EditRequest<N>),
    /// See [`TreeSignals::expand_element`].
    Expand(N),
    /// See [`TreeSignals::select_element`].
    Select(N),
}

/// Queued connections from every model signal into one channel.
///
/// Dropping the subscription disconnects all four.
pub struct ModelSubscription<N> {
    _refresh: ConnectionGuard<()>,
    _edit: ConnectionGuard<EditRequest<N>>,
    _expand: ConnectionGuard<N>,
    _select: ConnectionGuard<N>,
}

/// A tree mirror plus the controller that owns its mutations.
///
/// Models are shared between the host and any number of views, so they are
/// normally held in an [`Arc`].
pub struct TreeModel<M: TreeMirror> {
    mirror: Arc<M>,
    controller: Option<TreeController<M>>,
    capabilities: ControllerCapabilities,
    signals: TreeSignals<M::Node>,
}

impl<M: TreeMirror> TreeModel<M> {
    /// Creates a model without a controller. Every gesture that needs one is
    /// a no-op.
    pub fn new(mirror: M) -> Self {
        Self::from_arc(Arc::new(mirror))
    }

    /// Creates a model around a shared mirror.
    pub fn from_arc(mirror: Arc<M>) -> Self {
        Self {
            mirror,
            controller: None,
            capabilities: ControllerCapabilities::default(),
            signals: TreeSignals::new(),
        }
    }

    /// Attaches a controller and records its capabilities.
    pub fn with_controller(mut self, controller: TreeController<M>) -> Self {
        self.capabilities = controller.capabilities();
        tracing::debug!(
            target: mirror_view_core::logging::targets::VIEW,
            capabilities = ?self.capabilities,
            "controller registered"
        );
        self.controller = Some(controller);
        self
    }

    /// The mirror.
    pub fn mirror(&self) -> &M {
        &self.mirror
    }

    /// A shared handle to the mirror.
    pub fn shared_mirror(&self) -> Arc<M> {
        Arc::clone(&self.mirror)
    }

    /// The controller, if one is attached.
    pub fn controller(&self) -> Option<&TreeController<M>> {
        self.controller.as_ref()
    }

    /// Capabilities recorded when the controller was attached.
    pub fn capabilities(&self) -> ControllerCapabilities {
        self.capabilities
    }

    /// The model's signals.
    pub fn signals(&self) -> &TreeSignals<M::Node> {
        &self.signals
    }

    /// Asks every view to rebuild from the mirror.
    pub fn refresh(&self) {
        self.signals.refresh.emit(());
    }

    /// Asks every view to open an inline editor on `node`.
    pub fn edit_element(&self, node: M::Node, from: Option<usize>, to: Option<usize>) {
        self.signals
            .edit_element
            .emit(EditRequest { node, from, to });
    }

    /// Asks every view to expand `node` by one level.
    pub fn expand_element(&self, node: M::Node) {
        self.signals.expand_element.emit(node);
    }

    /// Asks every view to select `node`.
    pub fn select_element(&self, node: M::Node) {
        self.signals.select_element.emit(node);
    }

    /// Routes every signal into `sender` as [`ModelEvent`]s.
    pub fn subscribe(&self, sender: Sender<ModelEvent<M::Node>>) -> ModelSubscription<M::Node> {
        let refresh = self
            .signals
            .refresh
            .connect_queued(sender.clone(), |_| ModelEvent::Refresh);
        let edit = self
            .signals
            .edit_element
            .connect_queued(sender.clone(), |req| ModelEvent::Edit(req.clone()));
        let expand = self
            .signals
            .expand_element
            .connect_queued(sender.clone(), |node| ModelEvent::Expand(node.clone()));
        let select = self
            .signals
            .select_element
            .connect_queued(sender, |node| ModelEvent::Select(node.clone()));

        ModelSubscription {
            _refresh: self.signals.refresh.guard(refresh),
            _edit: self.signals.edit_element.guard(edit),
            _expand: self.signals.expand_element.guard(expand),
            _select: self.signals.select_element.guard(select),
        }
    }
}

impl<M: TreeMirror> fmt::Debug for TreeModel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeModel")
            .field("data_type", &self.mirror.data_type())
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::DragPayload;
    use mirror_view_core::CallbackResult;

    struct Numbers;

    impl TreeMirror for Numbers {
        type Node = u32;

        fn top(&self) -> Vec<u32> {
            vec![1, 2]
        }

        fn children(&self, _node: &u32) -> Vec<u32> {
            Vec::new()
        }

        fn is_leaf(&self, _node: &u32) -> bool {
            true
        }

        fn text(&self, node: &u32) -> String {
            node.to_string()
        }

        fn data_type(&self) -> &str {
            "text"
        }

        fn to_data(&self, nodes: &[u32]) -> CallbackResult<DragPayload> {
            Ok(DragPayload::from_text(format!("{nodes:?}")))
        }

        fn from_data(&self, _payload: &DragPayload) -> CallbackResult<Vec<u32>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_subscription_queues_events() {
        let model = TreeModel::new(Numbers);
        let (tx, rx) = crossbeam_channel::unbounded();
        let _sub = model.subscribe(tx);

        model.refresh();
        model.edit_element(2, Some(0), None);
        model.expand_element(1);
        model.select_element(2);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![
            ModelEvent::Refresh,
            ModelEvent::Edit(EditRequest {
                node: 2,
                from: Some(0),
                to: None,
            }),
            ModelEvent::Expand(1),
            ModelEvent::Select(2),
        ]);
    }

    #[test]
    fn test_dropping_subscription_disconnects() {
        let model = TreeModel::new(Numbers);
        let (tx, rx) = crossbeam_channel::unbounded();
        let sub = model.subscribe(tx);
        assert_eq!(model.signals().refresh.connection_count(), 1);

        drop(sub);
        model.refresh();
        assert_eq!(model.signals().refresh.connection_count(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_capabilities_recorded_at_registration() {
        let model = TreeModel::new(Numbers);
        assert_eq!(model.capabilities(), ControllerCapabilities::default());

        let model = TreeModel::new(Numbers)
            .with_controller(TreeController::<Numbers>::new().on_edited(|_, _, _| Ok(())));
        assert!(model.capabilities().edited);
        assert!(!model.capabilities().right_click);
        assert!(model.controller().is_some());
    }
}
