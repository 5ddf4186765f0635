//! Host platform detection.
//!
//! The probe decides whether the host is treated as Windows and derives the
//! vcpkg triplet and file naming conventions used for the rest of a run.
//! Unix-like compatibility layers running on Windows (Cygwin) report a Unix
//! OS, so the working directory is checked for the `cygdrive` marker too.

use std::path::Path;

/// Path segment that identifies a Cygwin-style working directory.
pub const COMPAT_LAYER_MARKER: &str = "cygdrive";

/// Default triplet on Windows hosts.
pub const WINDOWS_TRIPLET: &str = "x64-windows-static";

/// Default triplet on every other host.
pub const MACOS_TRIPLET: &str = "x64-osx";

/// Platform conventions computed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Whether Windows conventions apply
    pub is_windows: bool,
    /// vcpkg triplet (e.g., x64-windows-static, x64-osx)
    pub triplet: String,
}

impl Platform {
    /// Detect the host platform from the OS and the given working directory.
    pub fn detect(cwd: &Path) -> Self {
        Platform::from_host(cfg!(windows), cwd)
    }

    /// Build a platform from an explicit OS flag.
    pub fn from_host(os_is_windows: bool, cwd: &Path) -> Self {
        let is_windows = os_is_windows || cwd_has_compat_marker(cwd);
        Platform::new(is_windows)
    }

    /// Platform with the default triplet for the given family.
    pub fn new(is_windows: bool) -> Self {
        let triplet = if is_windows {
            WINDOWS_TRIPLET
        } else {
            MACOS_TRIPLET
        };

        Platform {
            is_windows,
            triplet: triplet.to_string(),
        }
    }

    /// Replace the triplet, keeping the platform family.
    pub fn with_triplet(mut self, triplet: impl Into<String>) -> Self {
        self.triplet = triplet.into();
        self
    }

    /// Executable suffix (`.exe` or empty).
    pub fn exe_suffix(&self) -> &'static str {
        if self.is_windows {
            ".exe"
        } else {
            ""
        }
    }

    /// Static library extension, including the dot.
    pub fn static_lib_ext(&self) -> &'static str {
        if self.is_windows {
            ".lib"
        } else {
            ".a"
        }
    }

    /// vcpkg bootstrap script for this platform.
    pub fn bootstrap_script(&self) -> &'static str {
        if self.is_windows {
            "bootstrap-vcpkg.bat"
        } else {
            "bootstrap-vcpkg.sh"
        }
    }

    /// Name of the vcpkg executable.
    pub fn vcpkg_exe_name(&self) -> String {
        format!("vcpkg{}", self.exe_suffix())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let family = if self.is_windows { "windows" } else { "unix" };
        write!(f, "{} ({})", family, self.triplet)
    }
}

fn cwd_has_compat_marker(cwd: &Path) -> bool {
    cwd.to_string_lossy().contains(COMPAT_LAYER_MARKER)
}
