//! Drop resolution.
//!
//! The widget reports where a drop lands as a [`DropZone`] within a row.
//! [`DropResolver`] turns that into a [`DropPosition`] and asks the drag
//! policy whether the drop is allowed, then performs it.

use std::fmt;
use std::sync::Arc;

use mirror_view_core::guarded;
use mirror_view_core::logging::{span_names, targets};

use crate::controller::{DragController, DropPosition};
use crate::mirror::{DragPayload, TreeMirror};

/// Where in a row the pointer is during a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    /// Upper third of the row.
    Top,
    /// Middle third of the row.
    Middle,
    /// Lower third of the row.
    Bottom,
    /// Not over any row.
    Outside,
}

impl DropZone {
    /// Maps a toolkit location code: 1 is before, 2 is after, 3 is on.
    /// Anything else means the pointer is outside every row.
    pub fn from_location_index(index: u8) -> Self {
        match index {
            1 => Self::Top,
            2 => Self::Bottom,
            3 => Self::Middle,
            _ => Self::Outside,
        }
    }

    /// Maps a pointer offset from the top of a row of height `row_height`.
    pub fn from_pointer(offset: f32, row_height: f32) -> Self {
        if !(row_height > 0.0) || !(0.0..row_height).contains(&offset) {
            return Self::Outside;
        }
        let third = row_height / 3.0;
        if offset < third {
            Self::Top
        } else if offset >= row_height - third {
            Self::Bottom
        } else {
            Self::Middle
        }
    }

    /// The position this zone stands for when reordering is allowed.
    pub fn position(self) -> DropPosition {
        match self {
            Self::Top => DropPosition::Before,
            Self::Bottom => DropPosition::After,
            Self::Middle | Self::Outside => DropPosition::Onto,
        }
    }
}

/// Resolves drop positions and delegates drops to the drag policy.
pub struct DropResolver<N> {
    policy: Option<Arc<dyn DragController<N>>>,
}

impl<N> Clone for DropResolver<N> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
        }
    }
}

impl<N: fmt::Debug> DropResolver<N> {
    /// Creates a resolver. Without a policy every drop is rejected.
    pub fn new(policy: Option<Arc<dyn DragController<N>>>) -> Self {
        Self { policy }
    }

    /// Whether a drag policy is present.
    pub fn has_policy(&self) -> bool {
        self.policy.is_some()
    }

    /// Whether the policy allows drops between rows. A failing query counts
    /// as not reorderable.
    pub fn reorderable(&self) -> bool {
        self.policy
            .as_ref()
            .and_then(|policy| guarded("reorderable", || policy.reorderable()))
            .unwrap_or(false)
    }

    /// Resolves `zone` into a drop position.
    pub fn resolve(&self, zone: DropZone) -> DropPosition {
        if self.reorderable() {
            zone.position()
        } else {
            DropPosition::Onto
        }
    }

    /// Asks the policy whether `dragged` may be dropped at `zone` of
    /// `target`. Any failure rejects the drop.
    pub fn validate(&self, dragged: &[N], target: Option<&N>, zone: DropZone) -> bool {
        let Some(policy) = &self.policy else {
            return false;
        };
        let position = self.resolve(zone);
        let allowed =
            guarded("can_drop", || policy.can_drop(dragged, target, position)).unwrap_or(false);
        tracing::trace!(target: targets::DROP, node = ?target, %position, allowed, "drop validated");
        allowed
    }

    /// Deserializes `payload` and performs the drop. Returns false if the
    /// payload cannot be read or the policy fails.
    pub fn execute<M>(&self, mirror: &M, payload: &DragPayload, target: Option<&N>, zone: DropZone) -> bool
    where
        M: TreeMirror<Node = N>,
    {
        let span = tracing::debug_span!(target: targets::DROP, span_names::DROP, node = ?target, ?zone);
        let _enter = span.enter();

        let Some(policy) = &self.policy else {
            tracing::debug!(target: targets::DROP, "no drag controller, drop ignored");
            return false;
        };
        let position = self.resolve(zone);
        let Some(nodes) = guarded("from_data", || mirror.from_data(payload)) else {
            return false;
        };

        let done = guarded("do_drop", || policy.do_drop(&nodes, target, position)).is_some();
        tracing::debug!(target: targets::DROP, count = nodes.len(), %position, done, "drop performed");
        done
    }
}

impl<N> fmt::Debug for DropResolver<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropResolver")
            .field("has_policy", &self.policy.is_some())
            .finish()
    }
}
