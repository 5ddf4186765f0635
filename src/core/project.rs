//! Project layout.
//!
//! A project is the directory holding one or more `.jucer` files. Everything
//! this tool produces lives next to them:
//!
//! ```text
//! <project>/
//! ├── MyPlugin.jucer
//! ├── vcpkg/                 # vcpkg clone and executable
//! │   └── installed/<triplet>/
//! └── external_libs -> vcpkg/installed/<triplet>
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::Platform;
use crate::util::fs::glob_files;

/// Extension of Projucer project files.
pub const JUCER_EXTENSION: &str = "jucer";

/// Directory the vcpkg repository is cloned into.
pub const VCPKG_DIR: &str = "vcpkg";

/// Link exposing the installed triplet tree.
pub const STAGING_DIR: &str = "external_libs";

/// Paths of a project checkout.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Project { root: root.into() }
    }

    /// Get the project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the vcpkg clone.
    pub fn vcpkg_dir(&self) -> PathBuf {
        self.root.join(VCPKG_DIR)
    }

    /// Path of the built vcpkg executable.
    pub fn vcpkg_exe(&self, platform: &Platform) -> PathBuf {
        self.vcpkg_dir().join(platform.vcpkg_exe_name())
    }

    /// Path of the vcpkg bootstrap script for the platform.
    pub fn bootstrap_script(&self, platform: &Platform) -> PathBuf {
        self.vcpkg_dir().join(platform.bootstrap_script())
    }

    /// vcpkg's install tree for the platform triplet.
    pub fn installed_dir(&self, platform: &Platform) -> PathBuf {
        self.vcpkg_dir().join("installed").join(&platform.triplet)
    }

    /// Fixed path the install tree is exposed at.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    /// Projucer files directly inside the project root, sorted.
    pub fn find_jucer_files(&self) -> Result<Vec<PathBuf>> {
        glob_files(&self.root, &[format!("*.{}", JUCER_EXTENSION)])
    }
}
