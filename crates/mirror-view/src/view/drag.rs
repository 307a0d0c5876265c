//! Drag sessions.
//!
//! A drag moves through `Idle -> Dragging -> Idle`. The session is created
//! by [`DragCoordinator::start`] with a snapshot of the selection, gets its
//! payload from [`DragCoordinator::set_data`] when the platform asks for
//! it, and is dropped by [`DragCoordinator::finish`] whatever the outcome.

use std::fmt;

use mirror_view_core::guarded;
use mirror_view_core::logging::targets;

use crate::config::DragStartFailure;
use crate::controller::DragController;
use crate::mirror::{DataType, DragPayload, TreeMirror};

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession<N> {
    nodes: Vec<N>,
    payload: Option<DragPayload>,
}

impl<N> DragSession<N> {
    /// The dragged nodes, as selected when the drag started.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// The serialized payload, once produced.
    pub fn payload(&self) -> Option<&DragPayload> {
        self.payload.as_ref()
    }
}

/// State of the drag coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState<N> {
    /// No drag is active.
    Idle,
    /// A drag is in progress.
    Dragging(DragSession<N>),
}

/// Owns the single drag session of a view.
pub struct DragCoordinator<N> {
    data_type: DataType,
    on_failure: DragStartFailure,
    state: DragState<N>,
}

impl<N: Clone + fmt::Debug> DragCoordinator<N> {
    /// Creates an idle coordinator serializing as `data_type`.
    pub fn new(data_type: DataType, on_failure: DragStartFailure) -> Self {
        Self {
            data_type,
            on_failure,
            state: DragState::Idle,
        }
    }

    /// The payload type this coordinator produces.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Starts a drag of `selection`. Returns whether the drag is allowed.
    ///
    /// An empty selection or a missing drag policy disallows the drag. A
    /// failing `drag_start` callback is resolved by the configured
    /// [`DragStartFailure`] policy.
    pub fn start(&mut self, policy: Option<&dyn DragController<N>>, selection: &[N]) -> bool {
        self.state = DragState::Idle;

        if selection.is_empty() {
            tracing::debug!(target: targets::DRAG, "empty selection, drag disallowed");
            return false;
        }
        let Some(policy) = policy else {
            tracing::debug!(target: targets::DRAG, "no drag controller, drag disallowed");
            return false;
        };

        let nodes = selection.to_vec();
        let allowed = match guarded("drag_start", || policy.drag_start(&nodes)) {
            Some(()) => true,
            None => match self.on_failure {
                DragStartFailure::FailClosed => false,
                DragStartFailure::FailOpen => {
                    tracing::warn!(target: targets::DRAG, "drag_start failed, proceeding anyway");
                    true
                }
            },
        };

        if allowed {
            tracing::debug!(target: targets::DRAG, count = nodes.len(), "drag started");
            self.state = DragState::Dragging(DragSession {
                nodes,
                payload: None,
            });
        }
        allowed
    }

    /// Serializes the dragged nodes through `mirror`.
    ///
    /// Returns `None` when no drag is active, when `to_data` fails, or when
    /// the payload does not have the shape of the declared data type.
    pub fn set_data<M>(&mut self, mirror: &M) -> Option<DragPayload>
    where
        M: TreeMirror<Node = N>,
    {
        let DragState::Dragging(session) = &mut self.state else {
            tracing::debug!(target: targets::DRAG, "data requested with no drag active");
            return None;
        };

        let payload = guarded("to_data", || mirror.to_data(&session.nodes))?;
        if let Err(err) = payload.check(self.data_type) {
            tracing::error!(target: targets::DRAG, error = %err, "drag data rejected");
            return None;
        }

        session.payload = Some(payload.clone());
        Some(payload)
    }

    /// Ends the drag, returning the session that was active.
    pub fn finish(&mut self) -> Option<DragSession<N>> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging(session) => {
                tracing::debug!(target: targets::DRAG, "drag finished");
                Some(session)
            }
            DragState::Idle => None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &DragState<N> {
        &self.state
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&DragSession<N>> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Returns true while a drag is active.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Nodes of the active drag, or an empty slice.
    pub fn dragged(&self) -> &[N] {
        self.session().map(DragSession::nodes).unwrap_or_default()
    }
}

impl<N: fmt::Debug> fmt::Debug for DragCoordinator<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragCoordinator")
            .field("data_type", &self.data_type)
            .field("on_failure", &self.on_failure)
            .field("state", &self.state)
            .finish()
    }
}
