//! Shared fixtures: an in-memory file tree, a widget that records what it is
//! told, and controllers that record what they are called with.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use mirror_view::prelude::*;
use mirror_view::view::DndRegistration;
use parking_lot::Mutex;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Mirror
// ============================================================================

/// A file tree keyed by absolute path. Directories are the keys of `dirs`;
/// every other node is a file.
pub struct FileMirror {
    roots: Mutex<Vec<String>>,
    dirs: Mutex<BTreeMap<String, Vec<String>>>,
    data_type: &'static str,
    text_payload: bool,
}

impl FileMirror {
    pub fn new(roots: &[&str], dirs: &[(&str, &[&str])]) -> Self {
        Self {
            roots: Mutex::new(roots.iter().map(|r| r.to_string()).collect()),
            dirs: Mutex::new(
                dirs.iter()
                    .map(|(d, c)| (d.to_string(), c.iter().map(|s| s.to_string()).collect()))
                    .collect(),
            ),
            data_type: "file",
            text_payload: false,
        }
    }

    /// Declares `data_type` and serializes as newline-separated text when it
    /// is `"text"`.
    pub fn with_data_type(mut self, data_type: &'static str) -> Self {
        self.data_type = data_type;
        self.text_payload = data_type == "text";
        self
    }

    pub fn set_roots(&self, roots: &[&str]) {
        *self.roots.lock() = roots.iter().map(|r| r.to_string()).collect();
    }

    pub fn set_children(&self, dir: &str, children: &[&str]) {
        self.dirs
            .lock()
            .insert(dir.to_string(), children.iter().map(|s| s.to_string()).collect());
    }
}

impl TreeMirror for FileMirror {
    type Node = String;

    fn top(&self) -> Vec<String> {
        self.roots.lock().clone()
    }

    fn children(&self, node: &String) -> Vec<String> {
        self.dirs.lock().get(node).cloned().unwrap_or_default()
    }

    fn is_leaf(&self, node: &String) -> bool {
        !self.dirs.lock().contains_key(node)
    }

    fn text(&self, node: &String) -> String {
        node.rsplit('/').next().unwrap_or(node).to_string()
    }

    fn icon(&self, node: &String) -> NodeIcon {
        if self.is_leaf(node) {
            NodeIcon::File
        } else {
            NodeIcon::Directory
        }
    }

    fn data_type(&self) -> &str {
        self.data_type
    }

    fn to_data(&self, nodes: &[String]) -> CallbackResult<DragPayload> {
        if self.text_payload {
            Ok(DragPayload::from_text(nodes.join("\n")))
        } else {
            Ok(DragPayload::from_paths(nodes.iter().map(String::as_str)))
        }
    }

    fn from_data(&self, payload: &DragPayload) -> CallbackResult<Vec<String>> {
        match payload {
            DragPayload::Files(_) => Ok(payload.path_strings()),
            DragPayload::Text(text) => Ok(text.lines().map(String::from).collect()),
        }
    }
}

/// ```text
/// /a
///   /a/main.rb
///   /a/x.txt
///   /a/y.txt
/// /b
///   /b/lib
///     /b/lib/util.rb
/// /README
/// ```
pub fn project() -> FileMirror {
    FileMirror::new(&["/a", "/b", "/README"], &[
        ("/a", &["/a/main.rb", "/a/x.txt", "/a/y.txt"]),
        ("/b", &["/b/lib"]),
        ("/b/lib", &["/b/lib/util.rb"]),
    ])
}

// ============================================================================
// Widget
// ============================================================================

#[derive(Debug, Default)]
pub struct RecordingWidget {
    pub rows: Vec<RowLabel>,
    pub rows_changed_calls: usize,
    pub selection: Vec<usize>,
    pub live_editors: Vec<EditorHandle>,
    pub opened_editors: Vec<(usize, String, Range<usize>)>,
    pub dnd: Option<DndRegistration>,
    pub drop_feedback: Option<bool>,
    pub disposed: bool,
    next_editor: u64,
}

impl RecordingWidget {
    pub fn texts(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.text.clone()).collect()
    }
}

impl TreeWidget for RecordingWidget {
    fn enable_drag_and_drop(&mut self, registration: DndRegistration) {
        self.dnd = Some(registration);
    }

    fn set_drop_feedback(&mut self, enabled: bool) {
        self.drop_feedback = Some(enabled);
    }

    fn rows_changed(&mut self, rows: &[RowLabel]) {
        self.rows = rows.to_vec();
        self.rows_changed_calls += 1;
    }

    fn selection_changed(&mut self, rows: &[usize]) {
        self.selection = rows.to_vec();
    }

    fn open_editor(&mut self, row: usize, text: &str, selection: Range<usize>) -> EditorHandle {
        self.next_editor += 1;
        let handle = EditorHandle(self.next_editor);
        self.live_editors.push(handle);
        self.opened_editors.push((row, text.to_string(), selection));
        handle
    }

    fn dispose_editor(&mut self, handle: EditorHandle) {
        self.live_editors.retain(|h| *h != handle);
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}

/// A [`RecordingWidget`] the test keeps a handle to after the view owns it.
#[derive(Debug, Clone, Default)]
pub struct SharedWidget(pub Arc<Mutex<RecordingWidget>>);

impl TreeWidget for SharedWidget {
    fn enable_drag_and_drop(&mut self, registration: DndRegistration) {
        self.0.lock().enable_drag_and_drop(registration);
    }

    fn set_drop_feedback(&mut self, enabled: bool) {
        self.0.lock().set_drop_feedback(enabled);
    }

    fn rows_changed(&mut self, rows: &[RowLabel]) {
        self.0.lock().rows_changed(rows);
    }

    fn selection_changed(&mut self, rows: &[usize]) {
        self.0.lock().selection_changed(rows);
    }

    fn open_editor(&mut self, row: usize, text: &str, selection: Range<usize>) -> EditorHandle {
        self.0.lock().open_editor(row, text, selection)
    }

    fn dispose_editor(&mut self, handle: EditorHandle) {
        self.0.lock().dispose_editor(handle);
    }

    fn dispose(&mut self) {
        self.0.lock().dispose();
    }
}

// ============================================================================
// Controllers
// ============================================================================

#[derive(Debug, Default)]
pub struct Calls {
    pub edited: Mutex<Vec<(String, String)>>,
    pub right_clicks: Mutex<Vec<Option<String>>>,
    pub activated: Mutex<Vec<String>>,
}

/// A controller with every non-drag capability, recording into `calls`.
pub fn recording_controller(calls: &Arc<Calls>) -> TreeController<FileMirror> {
    let edited = Arc::clone(calls);
    let right = Arc::clone(calls);
    let activated = Arc::clone(calls);
    TreeController::<FileMirror>::new()
        .on_edited(move |_model, node, text| {
            edited.edited.lock().push((node.clone(), text.to_string()));
            Ok(())
        })
        .on_right_click(move |_model, node| {
            right.right_clicks.lock().push(node.cloned());
            Ok(())
        })
        .on_activated(move |_model, node| {
            activated.activated.lock().push(node.clone());
            Ok(())
        })
}

pub type DropRecord = (Vec<String>, Option<String>, DropPosition);

#[derive(Debug, Default)]
pub struct RecordingDrag {
    pub reorderable: bool,
    pub fail_start: bool,
    pub reject: bool,
    pub panic_on_drop: bool,
    pub starts: Mutex<Vec<Vec<String>>>,
    pub validations: Mutex<Vec<DropRecord>>,
    pub drops: Mutex<Vec<DropRecord>>,
}

impl DragController<String> for RecordingDrag {
    fn reorderable(&self) -> CallbackResult<bool> {
        Ok(self.reorderable)
    }

    fn drag_start(&self, nodes: &[String]) -> CallbackResult<()> {
        self.starts.lock().push(nodes.to_vec());
        if self.fail_start {
            return Err("drag refused by policy".into());
        }
        Ok(())
    }

    fn can_drop(
        &self,
        nodes: &[String],
        target: Option<&String>,
        position: DropPosition,
    ) -> CallbackResult<bool> {
        self.validations
            .lock()
            .push((nodes.to_vec(), target.cloned(), position));
        Ok(!self.reject)
    }

    fn do_drop(
        &self,
        nodes: &[String],
        target: Option<&String>,
        position: DropPosition,
    ) -> CallbackResult<()> {
        if self.panic_on_drop {
            panic!("drop handler crashed");
        }
        self.drops.lock().push((nodes.to_vec(), target.cloned(), position));
        Ok(())
    }
}

pub fn with_drag(drag: &Arc<RecordingDrag>) -> TreeController<FileMirror> {
    let policy: Arc<dyn DragController<String>> = drag.clone();
    TreeController::<FileMirror>::new().with_drag(policy)
}

// ============================================================================
// Views
// ============================================================================

pub type View = TreeViewCore<FileMirror, RecordingWidget>;

pub fn view_with(
    mirror: FileMirror,
    controller: Option<TreeController<FileMirror>>,
    config: TreeViewConfig,
) -> (Arc<TreeModel<FileMirror>>, View) {
    init_tracing();
    let mut model = TreeModel::new(mirror);
    if let Some(controller) = controller {
        model = model.with_controller(controller);
    }
    let model = Arc::new(model);
    let factory = TreeViewFactory::new(config);
    let view = factory
        .create(Arc::clone(&model), RecordingWidget::default())
        .expect("view construction");
    (model, view)
}

pub fn view(controller: Option<TreeController<FileMirror>>) -> (Arc<TreeModel<FileMirror>>, View) {
    view_with(project(), controller, TreeViewConfig::default())
}
