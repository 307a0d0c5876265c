//! Shared icon resources.
//!
//! Icons are decoded once per [`IconKind`] and kept in an [`IconRegistry`]
//! owned by the view factory. Each view holds an [`IconLease`] while it is
//! open; when the last lease is released the cache is torn down and the
//! next view to attach starts from scratch.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;
use mirror_view_core::logging::targets;
use parking_lot::Mutex;

use crate::error::{Result, TreeViewError};
use crate::mirror::NodeIcon;

/// The icons the view knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    /// Folder icon.
    Directory,
    /// File icon.
    File,
}

impl IconKind {
    /// Maps a node's requested icon to a known kind.
    pub fn for_node(icon: &NodeIcon) -> Option<Self> {
        match icon {
            NodeIcon::Directory => Some(Self::Directory),
            NodeIcon::File => Some(Self::File),
            NodeIcon::None | NodeIcon::Other(_) => None,
        }
    }

    /// The resource file name for this kind.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Directory => "darwin-folder.png",
            Self::File => "darwin-file.png",
        }
    }
}

/// A decoded icon, cheap to clone.
#[derive(Clone)]
pub struct Icon {
    kind: IconKind,
    image: Arc<RgbaImage>,
}

impl Icon {
    /// Wraps a decoded image.
    pub fn new(kind: IconKind, image: RgbaImage) -> Self {
        Self {
            kind,
            image: Arc::new(image),
        }
    }

    /// Which icon this is.
    pub fn kind(&self) -> IconKind {
        self.kind
    }

    /// The pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Returns true if both handles share the same pixels.
    pub fn same_image(&self, other: &Icon) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Icon")
            .field("kind", &self.kind)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish()
    }
}

/// Loads icon images.
pub trait IconLoader: Send + Sync {
    /// Loads the image for `kind`.
    fn load(&self, kind: IconKind) -> Result<Icon>;
}

/// Loads icons from PNG files in a directory.
#[derive(Debug, Clone)]
pub struct FileIconLoader {
    dir: PathBuf,
}

impl FileIconLoader {
    /// Creates a loader reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl IconLoader for FileIconLoader {
    fn load(&self, kind: IconKind) -> Result<Icon> {
        let path = self.dir.join(kind.file_name());
        let image = image::open(&path).map_err(|e| TreeViewError::icon(&path, e))?;
        tracing::debug!(target: targets::ICONS, path = %path.display(), "icon loaded");
        Ok(Icon::new(kind, image.into_rgba8()))
    }
}

#[derive(Clone)]
enum CacheEntry {
    Found(Icon),
    NotFound,
}

#[derive(Default)]
struct RegistryState {
    leases: usize,
    cache: HashMap<IconKind, CacheEntry>,
}

/// Reference-counted icon cache.
pub struct IconRegistry {
    loader: Option<Box<dyn IconLoader>>,
    state: Mutex<RegistryState>,
}

impl IconRegistry {
    /// Creates a registry backed by `loader`.
    pub fn new(loader: impl IconLoader + 'static) -> Self {
        Self {
            loader: Some(Box::new(loader)),
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Creates a registry that never produces icons.
    pub fn without_icons() -> Self {
        Self {
            loader: None,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Registers one more user of the cache.
    pub fn attach(self: &Arc<Self>) -> IconLease {
        let mut state = self.state.lock();
        state.leases += 1;
        if state.leases == 1 {
            tracing::debug!(target: targets::ICONS, "icon registry initialized");
        }
        IconLease {
            registry: Some(Arc::clone(self)),
        }
    }

    fn detach(&self) {
        let mut state = self.state.lock();
        state.leases = state.leases.saturating_sub(1);
        if state.leases == 0 {
            state.cache.clear();
            tracing::debug!(target: targets::ICONS, "icon registry torn down");
        }
    }

    /// Returns the icon for `kind`, loading it on first use.
    ///
    /// A failed load is logged once and remembered, so the view draws the
    /// node without an icon from then on.
    pub fn icon(&self, kind: IconKind) -> Option<Icon> {
        let loader = self.loader.as_ref()?;
        let mut state = self.state.lock();
        if let Some(entry) = state.cache.get(&kind) {
            return match entry {
                CacheEntry::Found(icon) => Some(icon.clone()),
                CacheEntry::NotFound => None,
            };
        }

        let entry = match loader.load(kind) {
            Ok(icon) => CacheEntry::Found(icon),
            Err(err) => {
                tracing::warn!(target: targets::ICONS, ?kind, error = %err, "icon unavailable");
                CacheEntry::NotFound
            }
        };
        state.cache.insert(kind, entry.clone());
        match entry {
            CacheEntry::Found(icon) => Some(icon),
            CacheEntry::NotFound => None,
        }
    }

    /// Number of open leases.
    pub fn lease_count(&self) -> usize {
        self.state.lock().leases
    }

    /// Number of cached entries, including remembered failures.
    pub fn cached_count(&self) -> usize {
        self.state.lock().cache.len()
    }
}

impl fmt::Debug for IconRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("IconRegistry")
            .field("leases", &state.leases)
            .field("cached", &state.cache.len())
            .finish()
    }
}

/// A view's hold on an [`IconRegistry`]. Released on drop.
pub struct IconLease {
    registry: Option<Arc<IconRegistry>>,
}

impl IconLease {
    /// Releases the lease. Calling this more than once has no effect.
    pub fn release(&mut self) {
        if let Some(registry) = self.registry.take() {
            registry.detach();
        }
    }
}

impl Drop for IconLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for IconLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconLease")
            .field("released", &self.registry.is_none())
            .finish()
    }
}

static_assertions::assert_impl_all!(IconRegistry: Send, Sync);
static_assertions::assert_impl_all!(Icon: Send, Sync);
