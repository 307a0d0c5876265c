//! Flattened visible rows and the element/row lookup tables.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use mirror_view_core::logging::targets;

use super::content::ContentBridge;
use crate::mirror::TreeMirror;

/// One visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<N> {
    /// The node drawn in this row.
    pub node: N,
    /// Indentation level.
    pub depth: usize,
    /// Whether the node shows an expander.
    pub has_children: bool,
    /// Whether the node's children follow this row.
    pub expanded: bool,
}

/// The visible rows of a tree, in display order.
///
/// Rows are derived state. They are rebuilt from the mirror on every
/// refresh; only the expanded set and the selection survive a rebuild, and
/// the selection only for nodes that are still visible.
#[derive(Debug)]
pub struct RowTable<N> {
    rows: Vec<Row<N>>,
    index: HashMap<N, usize>,
    expanded: HashSet<N>,
    selected: Vec<N>,
}

impl<N: Clone + Eq + Hash> Default for RowTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone + Eq + Hash> RowTable<N> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
            expanded: HashSet::new(),
            selected: Vec::new(),
        }
    }

    /// Rebuilds the rows from `content`.
    pub fn rebuild<M>(&mut self, content: &ContentBridge<M>)
    where
        M: TreeMirror<Node = N>,
    {
        self.rows.clear();
        self.index.clear();

        let mut ancestors = HashSet::new();
        for root in content.roots() {
            self.flatten(content, root, 0, &mut ancestors);
        }

        let index = &self.index;
        self.selected.retain(|node| index.contains_key(node));
        self.selected.sort_by_key(|node| index.get(node).copied());

        tracing::debug!(
            target: targets::VIEW,
            rows = self.rows.len(),
            expanded = self.expanded.len(),
            selected = self.selected.len(),
            "rows rebuilt"
        );
    }

    fn flatten<M>(
        &mut self,
        content: &ContentBridge<M>,
        node: N,
        depth: usize,
        ancestors: &mut HashSet<N>,
    ) where
        M: TreeMirror<Node = N>,
    {
        let has_children = content.has_children(&node);
        let expanded = has_children && self.expanded.contains(&node);

        let row = self.rows.len();
        self.index.entry(node.clone()).or_insert(row);
        self.rows.push(Row {
            node: node.clone(),
            depth,
            has_children,
            expanded,
        });

        // A node that is its own ancestor is drawn but not descended into.
        if expanded && ancestors.insert(node.clone()) {
            for child in content.children(&node) {
                self.flatten(content, child, depth + 1, ancestors);
            }
            ancestors.remove(&node);
        }
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All visible rows.
    pub fn rows(&self) -> &[Row<N>] {
        &self.rows
    }

    /// The row at `row`.
    pub fn row(&self, row: usize) -> Option<&Row<N>> {
        self.rows.get(row)
    }

    /// The node drawn at `row`.
    pub fn node(&self, row: usize) -> Option<&N> {
        self.rows.get(row).map(|r| &r.node)
    }

    /// The first row drawing `node`, if it is visible.
    pub fn find(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// Whether `node` is in the expanded set.
    pub fn is_expanded(&self, node: &N) -> bool {
        self.expanded.contains(node)
    }

    /// Marks `node` expanded. Returns true if it was not already.
    pub fn expand(&mut self, node: &N) -> bool {
        self.expanded.insert(node.clone())
    }

    /// Marks `node` collapsed. Returns true if it was expanded.
    pub fn collapse(&mut self, node: &N) -> bool {
        self.expanded.remove(node)
    }

    /// Selected nodes in row order.
    pub fn selection(&self) -> &[N] {
        &self.selected
    }

    /// Row indices of the selected nodes.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.selected.iter().filter_map(|n| self.find(n)).collect()
    }

    /// Replaces the selection with the nodes at `rows`. Indices past the end
    /// are ignored. Returns true if the selection changed.
    pub fn set_selected_rows(&mut self, rows: &[usize]) -> bool {
        let mut rows: Vec<usize> = rows.iter().copied().filter(|&r| r < self.rows.len()).collect();
        rows.sort_unstable();
        rows.dedup();

        let selected: Vec<N> = rows.into_iter().map(|r| self.rows[r].node.clone()).collect();
        if selected == self.selected {
            return false;
        }
        self.selected = selected;
        true
    }

    /// Selects exactly `node`, if visible. Returns true if it was.
    pub fn select(&mut self, node: &N) -> bool {
        if !self.index.contains_key(node) {
            return false;
        }
        self.selected = vec![node.clone()];
        true
    }

    /// Drops every row, the selection and the expanded set.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.index.clear();
        self.expanded.clear();
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use mirror_view_core::CallbackResult;
    use parking_lot::Mutex;

    use super::*;
    use crate::mirror::DragPayload;

    /// Tree given as parent -> children, with "" as the invisible root.
    struct Outline {
        edges: Mutex<BTreeMap<&'static str, Vec<&'static str>>>,
    }

    impl Outline {
        fn new(edges: &[(&'static str, &[&'static str])]) -> Arc<Self> {
            Arc::new(Self {
                edges: Mutex::new(edges.iter().map(|(p, c)| (*p, c.to_vec())).collect()),
            })
        }

        fn set(&self, parent: &'static str, children: &[&'static str]) {
            self.edges.lock().insert(parent, children.to_vec());
        }
    }

    impl TreeMirror for Outline {
        type Node = &'static str;

        fn top(&self) -> Vec<&'static str> {
            self.children(&"")
        }

        fn children(&self, node: &&'static str) -> Vec<&'static str> {
            self.edges.lock().get(node).cloned().unwrap_or_default()
        }

        fn is_leaf(&self, node: &&'static str) -> bool {
            !self.edges.lock().contains_key(node)
        }

        fn text(&self, node: &&'static str) -> String {
            node.to_string()
        }

        fn data_type(&self) -> &str {
            "text"
        }

        fn to_data(&self, _nodes: &[&'static str]) -> CallbackResult<DragPayload> {
            Ok(DragPayload::from_text(""))
        }

        fn from_data(&self, _payload: &DragPayload) -> CallbackResult<Vec<&'static str>> {
            Ok(Vec::new())
        }
    }

    fn visible(table: &RowTable<&'static str>) -> Vec<(&'static str, usize)> {
        table.rows().iter().map(|r| (r.node, r.depth)).collect()
    }

    #[test]
    fn test_collapsed_tree_shows_roots() {
        let mirror = Outline::new(&[("", &["a", "b"]), ("a", &["a1", "a2"])]);
        let content = ContentBridge::new(mirror);
        let mut table = RowTable::new();
        table.rebuild(&content);

        assert_eq!(visible(&table), vec![("a", 0), ("b", 0)]);
        assert!(table.row(0).unwrap().has_children);
        assert!(!table.row(1).unwrap().has_children);
    }

    #[test]
    fn test_expanded_children_follow_parent() {
        let mirror = Outline::new(&[("", &["a", "b"]), ("a", &["a1", "a2"]), ("a1", &["x"])]);
        let content = ContentBridge::new(mirror);
        let mut table = RowTable::new();
        table.expand(&"a");
        table.expand(&"a1");
        table.rebuild(&content);

        assert_eq!(visible(&table), vec![("a", 0), ("a1", 1), ("x", 2), ("a2", 1), ("b", 0)]);
        assert_eq!(table.find(&"a2"), Some(3));
        assert_eq!(table.node(2), Some(&"x"));
        assert_eq!(table.find(&"zzz"), None);
        assert_eq!(table.node(9), None);
    }

    #[test]
    fn test_selection_survives_rebuild_for_present_nodes() {
        let mirror = Outline::new(&[("", &["a", "b", "c"])]);
        let content = ContentBridge::new(Arc::clone(&mirror));
        let mut table = RowTable::new();
        table.rebuild(&content);
        assert!(table.set_selected_rows(&[2, 0, 0, 7]));
        assert_eq!(table.selection(), &["a", "c"]);

        mirror.set("", &["c", "b"]);
        table.rebuild(&content);
        assert_eq!(table.selection(), &["c"]);
        assert_eq!(table.selected_rows(), vec![0]);
    }

    #[test]
    fn test_expansion_survives_rebuild() {
        let mirror = Outline::new(&[("", &["a"]), ("a", &["a1"])]);
        let content = ContentBridge::new(Arc::clone(&mirror));
        let mut table = RowTable::new();
        table.expand(&"a");
        table.rebuild(&content);
        assert_eq!(table.len(), 2);

        mirror.set("a", &["a1", "a2"]);
        table.rebuild(&content);
        assert_eq!(visible(&table), vec![("a", 0), ("a1", 1), ("a2", 1)]);
        assert!(table.is_expanded(&"a"));
    }

    #[test]
    fn test_self_referencing_node_is_not_descended_twice() {
        let mirror = Outline::new(&[("", &["loop"]), ("loop", &["loop"])]);
        let content = ContentBridge::new(mirror);
        let mut table = RowTable::new();
        table.expand(&"loop");
        table.rebuild(&content);
        assert_eq!(visible(&table), vec![("loop", 0), ("loop", 1)]);
        assert_eq!(table.find(&"loop"), Some(0));
    }

    #[test]
    fn test_select_requires_visible_node() {
        let mirror = Outline::new(&[("", &["a"]), ("a", &["a1"])]);
        let content = ContentBridge::new(mirror);
        let mut table = RowTable::new();
        table.rebuild(&content);

        assert!(!table.select(&"a1"));
        assert!(table.selection().is_empty());
        assert!(table.select(&"a"));
        assert_eq!(table.selection(), &["a"]);
        assert!(!table.set_selected_rows(&[0]));
    }
}
