//! Display labels for mirror nodes.

use std::sync::Arc;

use super::icons::{Icon, IconKind, IconRegistry};
use crate::mirror::TreeMirror;

/// Text and icon for one node.
#[derive(Debug, Clone)]
pub struct NodeLabel {
    /// Display text.
    pub text: String,
    /// Icon, if the node asks for one the registry can supply.
    pub icon: Option<Icon>,
}

/// Turns node text and icon requests into displayable labels.
pub struct LabelBridge<M: TreeMirror> {
    mirror: Arc<M>,
    icons: Arc<IconRegistry>,
}

impl<M: TreeMirror> LabelBridge<M> {
    /// Creates a bridge drawing icons from `icons`.
    pub fn new(mirror: Arc<M>, icons: Arc<IconRegistry>) -> Self {
        Self { mirror, icons }
    }

    /// Display text of `node`.
    pub fn text(&self, node: &M::Node) -> String {
        self.mirror.text(node)
    }

    /// Icon of `node`. Unknown icon names yield `None`.
    pub fn icon(&self, node: &M::Node) -> Option<Icon> {
        let kind = IconKind::for_node(&self.mirror.icon(node))?;
        self.icons.icon(kind)
    }

    /// Text and icon together.
    pub fn label(&self, node: &M::Node) -> NodeLabel {
        NodeLabel {
            text: self.text(node),
            icon: self.icon(node),
        }
    }
}
