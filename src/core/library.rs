//! Staged static libraries and their naming conventions.
//!
//! vcpkg installs release libraries under `lib/` and debug libraries under
//! `debug/lib/`. Debug variants usually carry a `d` right before the
//! extension (`libcairod.a`, `cairod.lib`). Projucer has a single
//! `externalLibraries` list per exporter, so debug names are normalized to
//! match the release names before they are linked.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::Platform;
use crate::util::fs::glob_files;

/// Marker vcpkg appends to debug library names.
pub const DEBUG_SUFFIX: char = 'd';

/// A debug library name that does not follow the `<stem>d<ext>` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameRule {
    /// Debug file name as installed
    pub from: &'static str,
    /// Normalized name
    pub to: &'static str,
    /// Only applies to Windows triplets
    pub windows_only: bool,
}

/// Explicit renames applied before the generic suffix rule.
///
/// libexpat tags the CRT flavour after the debug marker on Windows.
pub const RENAME_RULES: &[RenameRule] = &[RenameRule {
    from: "libexpatdMD.lib",
    to: "libexpatMD.lib",
    windows_only: true,
}];

impl RenameRule {
    /// Whether this rule applies on the given platform.
    pub fn applies_to(&self, platform: &Platform) -> bool {
        !self.windows_only || platform.is_windows
    }
}

/// Exporter family of a Projucer export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFamily {
    /// Visual Studio exporters (`VS2019`, `VS2022`, ...)
    VisualStudio,
    /// Makefile, Xcode and other exporters that take linker-style names
    Makefile,
}

impl TargetFamily {
    /// Classify an export target by its element name.
    pub fn from_tag(tag: &str) -> Self {
        if tag.contains("VS") {
            TargetFamily::VisualStudio
        } else {
            TargetFamily::Makefile
        }
    }

    /// Whether targets of this family are patched on the given platform.
    pub fn matches(&self, platform: &Platform) -> bool {
        match self {
            TargetFamily::VisualStudio => platform.is_windows,
            TargetFamily::Makefile => !platform.is_windows,
        }
    }

    /// Name to list in `externalLibraries` for a library file.
    ///
    /// Visual Studio takes the file name as is. Other exporters pass the
    /// entry to the linker as `-l<name>`, so the `lib` prefix and the
    /// extension are dropped.
    pub fn link_name(&self, file_name: &str) -> String {
        match self {
            TargetFamily::VisualStudio => file_name.to_string(),
            TargetFamily::Makefile => {
                let stem = Path::new(file_name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file_name.to_string());
                match stem.strip_prefix("lib") {
                    Some(rest) if !rest.is_empty() => rest.to_string(),
                    _ => stem,
                }
            }
        }
    }
}

/// Strip the debug marker from a library file name.
///
/// Returns `None` when the name does not end in `d<ext>`.
pub fn strip_debug_suffix(file_name: &str, ext: &str) -> Option<String> {
    let stem = file_name.strip_suffix(ext)?.strip_suffix(DEBUG_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(format!("{}{}", stem, ext))
}

/// The staged library tree exposed at `external_libs`.
#[derive(Debug, Clone)]
pub struct StagedLibraries {
    root: PathBuf,
    ext: &'static str,
}

impl StagedLibraries {
    pub fn new(root: impl Into<PathBuf>, platform: &Platform) -> Self {
        StagedLibraries {
            root: root.into(),
            ext: platform.static_lib_ext(),
        }
    }

    /// Root of the staged tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    /// Release library directory.
    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    /// Debug library directory.
    pub fn debug_lib_dir(&self) -> PathBuf {
        self.root.join("debug").join("lib")
    }

    /// Static library extension for this tree.
    pub fn ext(&self) -> &'static str {
        self.ext
    }

    /// Library files in the debug directory, sorted by path.
    pub fn debug_libraries(&self) -> Result<Vec<PathBuf>> {
        self.libraries_in(&self.debug_lib_dir())
    }

    /// File names of the debug libraries, which are the names linked by
    /// every configuration once normalized.
    pub fn library_names(&self) -> Result<Vec<String>> {
        Ok(self
            .debug_libraries()?
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect())
    }

    /// Whether the release directory holds a library with this file name.
    pub fn has_release(&self, file_name: &str) -> bool {
        self.lib_dir().join(file_name).is_file()
    }

    fn libraries_in(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            tracing::debug!("library directory missing: {}", dir.display());
            return Ok(Vec::new());
        }
        glob_files(dir, &[format!("*{}", self.ext)])
    }
}
