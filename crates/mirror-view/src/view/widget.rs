//! The host widget interface.
//!
//! The view drives a concrete toolkit widget only through [`TreeWidget`].
//! The widget keeps no authoritative state: it is told which rows to draw,
//! which are selected, and when to show or dispose the inline editor.

use std::ops::Range;

use super::icons::Icon;
use crate::mirror::{DataType, DropAction};

/// Widget-issued handle for an inline editor overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditorHandle(pub u64);

/// Everything the widget needs to draw one visible row.
#[derive(Debug, Clone)]
pub struct RowLabel {
    /// Indentation level; roots are at depth 0.
    pub depth: usize,
    /// Display text.
    pub text: String,
    /// Icon, if any.
    pub icon: Option<Icon>,
    /// Whether an expander should be drawn.
    pub has_children: bool,
    /// Whether the row is expanded.
    pub expanded: bool,
}

/// What the widget should accept as a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DndRegistration {
    /// Payload type for both drag source and drop target.
    pub data_type: DataType,
    /// Operations offered to the platform.
    pub actions: DropAction,
}

/// Mouse buttons as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Middle button.
    Middle,
    /// Secondary button.
    Right,
    /// Any other button, by toolkit number.
    Other(u16),
}

/// A concrete tree widget driven by the view.
pub trait TreeWidget {
    /// Enables the widget as a drag source and drop target.
    fn enable_drag_and_drop(&mut self, registration: DndRegistration);

    /// Turns insertion feedback (before/after markers) on or off.
    fn set_drop_feedback(&mut self, enabled: bool);

    /// Replaces every visible row.
    fn rows_changed(&mut self, rows: &[RowLabel]);

    /// Replaces the selection with the given row indices.
    fn selection_changed(&mut self, rows: &[usize]);

    /// Shows an inline text editor over `row`, seeded with `text` and with
    /// the character range `selection` selected.
    fn open_editor(&mut self, row: usize, text: &str, selection: Range<usize>) -> EditorHandle;

    /// Removes an editor previously returned by [`open_editor`](Self::open_editor).
    fn dispose_editor(&mut self, handle: EditorHandle);

    /// Releases the widget. No further calls follow.
    fn dispose(&mut self);
}
