//! Inline editing.
//!
//! An [`EditSession`] binds one node to a widget editor overlay. It is
//! either closed or open on exactly one node; a second open request while
//! one is active is refused. Every way out (commit or cancel) disposes the
//! overlay before anything else runs.

use std::fmt;
use std::ops::Range;

use mirror_view_core::logging::targets;

use super::widget::{EditorHandle, TreeWidget};

/// Keys the view reacts to while an editor is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKey {
    /// Confirm the edit.
    Return,
    /// Abandon the edit.
    Escape,
    /// Anything else; handled by the editor itself.
    Other,
}

struct ActiveEdit<N> {
    node: N,
    row: usize,
    buffer: String,
    selection: Range<usize>,
    handle: EditorHandle,
}

/// Clamps a requested character selection to `text`.
///
/// Missing bounds select from the start or to the end. Reversed bounds are
/// swapped.
pub fn clamp_selection(text: &str, from: Option<usize>, to: Option<usize>) -> Range<usize> {
    let len = text.chars().count();
    let from = from.unwrap_or(0).min(len);
    let to = to.unwrap_or(len).min(len);
    if from <= to { from..to } else { to..from }
}

/// The view's single inline editor.
pub struct EditSession<N> {
    active: Option<ActiveEdit<N>>,
}

impl<N> Default for EditSession<N> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<N: Clone + fmt::Debug> EditSession<N> {
    /// Creates a closed session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an editor over `row`, seeded with `text`.
    ///
    /// Returns false, leaving the current editor untouched, if one is
    /// already open.
    pub fn open<W>(
        &mut self,
        widget: &mut W,
        node: N,
        row: usize,
        text: String,
        from: Option<usize>,
        to: Option<usize>,
    ) -> bool
    where
        W: TreeWidget + ?Sized,
    {
        if let Some(active) = &self.active {
            tracing::warn!(
                target: targets::EDIT,
                open = ?active.node,
                requested = ?node,
                "editor already open, request refused"
            );
            return false;
        }

        let selection = clamp_selection(&text, from, to);
        let handle = widget.open_editor(row, &text, selection.clone());
        tracing::debug!(target: targets::EDIT, ?node, row, ?selection, "editor opened");
        self.active = Some(ActiveEdit {
            node,
            row,
            buffer: text,
            selection,
            handle,
        });
        true
    }

    /// Records the editor's current text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if let Some(active) = &mut self.active {
            active.buffer = text.into();
        }
    }

    /// Closes the editor and returns the node and final text for the commit
    /// callback. The overlay is already disposed when this returns.
    pub fn commit<W>(&mut self, widget: &mut W) -> Option<(N, String)>
    where
        W: TreeWidget + ?Sized,
    {
        let active = self.active.take()?;
        widget.dispose_editor(active.handle);
        tracing::debug!(target: targets::EDIT, node = ?active.node, "editor committed");
        Some((active.node, active.buffer))
    }

    /// Closes the editor, discarding the text. Returns false if none was
    /// open.
    pub fn cancel<W>(&mut self, widget: &mut W) -> bool
    where
        W: TreeWidget + ?Sized,
    {
        let Some(active) = self.active.take() else {
            return false;
        };
        widget.dispose_editor(active.handle);
        tracing::debug!(target: targets::EDIT, node = ?active.node, "editor cancelled");
        true
    }

    /// Returns true while an editor is open.
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// The node being edited.
    pub fn node(&self) -> Option<&N> {
        self.active.as_ref().map(|a| &a.node)
    }

    /// The row the editor was opened over.
    pub fn row(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.row)
    }

    /// The current text.
    pub fn text(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.buffer.as_str())
    }

    /// The initial selection, in characters.
    pub fn selection(&self) -> Option<Range<usize>> {
        self.active.as_ref().map(|a| a.selection.clone())
    }

    /// The overlay handle.
    pub fn handle(&self) -> Option<EditorHandle> {
        self.active.as_ref().map(|a| a.handle)
    }
}

impl<N: fmt::Debug> fmt::Debug for EditSession<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.active {
            Some(active) => f
                .debug_struct("EditSession")
                .field("node", &active.node)
                .field("row", &active.row)
                .field("buffer", &active.buffer)
                .finish(),
            None => f.write_str("EditSession(closed)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::widget::{DndRegistration, RowLabel};

    #[derive(Default)]
    struct Overlays {
        next: u64,
        live: Vec<EditorHandle>,
        opened: Vec<(usize, String, Range<usize>)>,
    }

    impl TreeWidget for Overlays {
        fn enable_drag_and_drop(&mut self, _registration: DndRegistration) {}

        fn set_drop_feedback(&mut self, _enabled: bool) {}

        fn rows_changed(&mut self, _rows: &[RowLabel]) {}

        fn selection_changed(&mut self, _rows: &[usize]) {}

        fn open_editor(&mut self, row: usize, text: &str, selection: Range<usize>) -> EditorHandle {
            self.next += 1;
            let handle = EditorHandle(self.next);
            self.live.push(handle);
            self.opened.push((row, text.to_string(), selection));
            handle
        }

        fn dispose_editor(&mut self, handle: EditorHandle) {
            self.live.retain(|h| *h != handle);
        }

        fn dispose(&mut self) {}
    }

    #[test]
    fn test_clamp_selection() {
        assert_eq!(clamp_selection("main.rb", Some(0), Some(3)), 0..3);
        assert_eq!(clamp_selection("main.rb", None, None), 0..7);
        assert_eq!(clamp_selection("main.rb", Some(5), None), 5..7);
        assert_eq!(clamp_selection("main.rb", Some(2), Some(99)), 2..7);
        assert_eq!(clamp_selection("main.rb", Some(4), Some(1)), 1..4);
        assert_eq!(clamp_selection("", Some(3), Some(5)), 0..0);
        assert_eq!(clamp_selection("été", None, None), 0..3);
    }

    #[test]
    fn test_open_commit() {
        let mut widget = Overlays::default();
        let mut edit = EditSession::new();
        assert!(edit.open(&mut widget, "a", 4, "main.rb".into(), Some(0), Some(3)));
        assert_eq!(widget.opened, vec![(4, "main.rb".to_string(), 0..3)]);
        assert_eq!(edit.row(), Some(4));
        assert_eq!(edit.selection(), Some(0..3));

        edit.set_text("main2.rb");
        assert_eq!(edit.text(), Some("main2.rb"));
        assert_eq!(edit.commit(&mut widget), Some(("a", "main2.rb".to_string())));
        assert!(widget.live.is_empty());
        assert!(!edit.is_open());
    }

    #[test]
    fn test_cancel_disposes() {
        let mut widget = Overlays::default();
        let mut edit = EditSession::new();
        edit.open(&mut widget, 1_u8, 0, "x".into(), None, None);
        assert_eq!(widget.live.len(), 1);

        assert!(edit.cancel(&mut widget));
        assert!(widget.live.is_empty());
        assert!(!edit.cancel(&mut widget));
        assert!(edit.commit(&mut widget).is_none());
    }

    #[test]
    fn test_second_open_refused() {
        let mut widget = Overlays::default();
        let mut edit = EditSession::new();
        assert!(edit.open(&mut widget, "first", 0, "first".into(), None, None));
        assert!(!edit.open(&mut widget, "second", 1, "second".into(), None, None));

        assert_eq!(edit.node(), Some(&"first"));
        assert_eq!(widget.live.len(), 1);
        assert_eq!(widget.opened.len(), 1);
    }

    #[test]
    fn test_set_text_when_closed_is_ignored() {
        let mut edit = EditSession::<u8>::new();
        edit.set_text("ignored");
        assert!(edit.text().is_none());
        assert!(edit.handle().is_none());
    }
}
