//! Pull-based content access over a tree mirror.

use std::sync::Arc;

use crate::mirror::TreeMirror;

/// Answers the widget's structural questions from a [`TreeMirror`].
///
/// This is a pure projection: nothing is cached, and children are only
/// requested for nodes the caller asks about.
pub struct ContentBridge<M: TreeMirror> {
    mirror: Arc<M>,
}

impl<M: TreeMirror> Clone for ContentBridge<M> {
    fn clone(&self) -> Self {
        Self {
            mirror: Arc::clone(&self.mirror),
        }
    }
}

impl<M: TreeMirror> ContentBridge<M> {
    /// Creates a bridge over `mirror`.
    pub fn new(mirror: Arc<M>) -> Self {
        Self { mirror }
    }

    /// The root nodes.
    pub fn roots(&self) -> Vec<M::Node> {
        self.mirror.top()
    }

    /// Children of `node`.
    pub fn children(&self, node: &M::Node) -> Vec<M::Node> {
        self.mirror.children(node)
    }

    /// Whether `node` should show an expander. Leaves never do.
    pub fn has_children(&self, node: &M::Node) -> bool {
        !self.mirror.is_leaf(node) && self.mirror.has_children(node)
    }

    /// Always `None`: the mirror has no upward links.
    pub fn parent(&self, _node: &M::Node) -> Option<M::Node> {
        None
    }
}
