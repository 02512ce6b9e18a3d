//! Project layout
//!
//! The directory convention the finders assume. Defaults follow a classic
//! Rails tree; every directory can be overridden from the command line.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::core::paths::absolutize;

pub const DEFAULT_VIEWS_DIR: &str = "app/views";
pub const DEFAULT_LAYOUTS_DIR: &str = "app/views/layouts";
/// Layouts dir below an overridden views dir
pub const LAYOUTS_SUBDIR: &str = "layouts";
pub const DEFAULT_CONTROLLERS_DIR: &str = "app/controllers";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Subdirectories of the public root the asset helpers resolve against.
pub const STYLESHEETS_DIR: &str = "stylesheets";
pub const JAVASCRIPTS_DIR: &str = "javascripts";
pub const IMAGES_DIR: &str = "images";

/// Absolute locations of the conventional project directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    views: PathBuf,
    layouts: PathBuf,
    controllers: PathBuf,
    public: PathBuf,
}

impl ProjectLayout {
    /// Build a layout with the default directories under `root`.
    ///
    /// `root` is taken as given; use [`ProjectLayout::open`] to validate
    /// and canonicalize a user-supplied root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            views: root.join(DEFAULT_VIEWS_DIR),
            layouts: root.join(DEFAULT_LAYOUTS_DIR),
            controllers: root.join(DEFAULT_CONTROLLERS_DIR),
            public: root.join(DEFAULT_PUBLIC_DIR),
            root,
        }
    }

    /// Canonicalize `root` and build the default layout under it.
    pub fn open(root: &Path) -> Result<Self> {
        let canonical = match fs::canonicalize(root) {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::RootNotFound {
                    path: root.to_path_buf(),
                })
            }
            Err(e) => return Err(Error::Io(e)),
        };
        if !canonical.is_dir() {
            return Err(Error::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        Ok(Self::new(canonical))
    }

    pub fn with_views_dir(mut self, dir: &Path) -> Self {
        self.views = absolutize(&self.root, dir);
        self
    }

    pub fn with_layouts_dir(mut self, dir: &Path) -> Self {
        self.layouts = absolutize(&self.root, dir);
        self
    }

    pub fn with_controllers_dir(mut self, dir: &Path) -> Self {
        self.controllers = absolutize(&self.root, dir);
        self
    }

    pub fn with_public_dir(mut self, dir: &Path) -> Self {
        self.public = absolutize(&self.root, dir);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn views_root(&self) -> &Path {
        &self.views
    }

    pub fn layouts_root(&self) -> &Path {
        &self.layouts
    }

    pub fn controllers_root(&self) -> &Path {
        &self.controllers
    }

    pub fn public_root(&self) -> &Path {
        &self.public
    }

    pub fn stylesheets_root(&self) -> PathBuf {
        self.public.join(STYLESHEETS_DIR)
    }

    pub fn javascripts_root(&self) -> PathBuf {
        self.public.join(JAVASCRIPTS_DIR)
    }

    pub fn images_root(&self) -> PathBuf {
        self.public.join(IMAGES_DIR)
    }

    /// Resolve a user-supplied path against the project root.
    pub fn absolutize(&self, path: &Path) -> PathBuf {
        absolutize(&self.root, path)
    }

    pub fn is_public(&self, path: &Path) -> bool {
        path.starts_with(&self.public)
    }
}
