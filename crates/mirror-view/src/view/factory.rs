//! Builds tree views that share configuration and icons.

use std::path::Path;
use std::sync::Arc;

use mirror_view_core::logging::targets;

use super::icons::{FileIconLoader, IconLoader, IconRegistry};
use super::tree_view::TreeViewCore;
use super::widget::TreeWidget;
use crate::config::TreeViewConfig;
use crate::error::Result;
use crate::mirror::TreeMirror;
use crate::model::TreeModel;

/// Creates [`TreeViewCore`]s and owns the resources they share.
///
/// The icon registry lives as long as the factory, but its cache only while
/// at least one view built here is open.
#[derive(Debug)]
pub struct TreeViewFactory {
    config: TreeViewConfig,
    icons: Arc<IconRegistry>,
}

impl Default for TreeViewFactory {
    fn default() -> Self {
        Self::new(TreeViewConfig::default())
    }
}

impl TreeViewFactory {
    /// Creates a factory. Icons are read from `config.icon_dir` when set;
    /// otherwise views draw no icons.
    pub fn new(config: TreeViewConfig) -> Self {
        let icons = match &config.icon_dir {
            Some(dir) => IconRegistry::new(FileIconLoader::new(dir)),
            None => IconRegistry::without_icons(),
        };
        Self {
            config,
            icons: Arc::new(icons),
        }
    }

    /// Creates a factory with a custom icon loader.
    pub fn with_icon_loader(config: TreeViewConfig, loader: impl IconLoader + 'static) -> Self {
        Self {
            config,
            icons: Arc::new(IconRegistry::new(loader)),
        }
    }

    /// Creates a factory from a TOML configuration file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(TreeViewConfig::load(path)?))
    }

    /// The configuration given to every view.
    pub fn config(&self) -> &TreeViewConfig {
        &self.config
    }

    /// The shared icon registry.
    pub fn icons(&self) -> &Arc<IconRegistry> {
        &self.icons
    }

    /// Number of views built here that are still open.
    pub fn open_views(&self) -> usize {
        self.icons.lease_count()
    }

    /// Builds a view over `model`, drawing into `widget`.
    pub fn create<M, W>(&self, model: Arc<TreeModel<M>>, widget: W) -> Result<TreeViewCore<M, W>>
    where
        M: TreeMirror,
        W: TreeWidget,
    {
        let view = TreeViewCore::new(model, widget, self.config.clone(), &self.icons)?;
        tracing::debug!(target: targets::VIEW, open_views = self.open_views(), "view created");
        Ok(view)
    }
}
