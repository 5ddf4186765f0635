//! Configuration file support.
//!
//! Two optional configuration file locations are read:
//! - Global: `~/.jucer-deps/config.toml` - User-wide defaults
//! - Project: `.jucer-deps/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Without any file the
//! tool clones upstream vcpkg and installs cairo for the host triplet.
//!
//! ```toml
//! [vcpkg]
//! url = "https://github.com/microsoft/vcpkg.git"
//! libraries = ["cairo"]
//! triplet = "arm64-osx"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Upstream vcpkg repository.
pub const DEFAULT_VCPKG_URL: &str = "https://github.com/microsoft/vcpkg.git";

/// Libraries installed when none are configured.
pub const DEFAULT_LIBRARIES: &[&str] = &["cairo"];

/// Name of the config directory, both global and per project.
pub const CONFIG_DIR: &str = ".jucer-deps";

/// Tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// vcpkg settings
    pub vcpkg: VcpkgConfig,
}

/// vcpkg-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VcpkgConfig {
    /// Repository to clone (defaults to upstream vcpkg)
    pub url: Option<String>,

    /// Ports to install (defaults to cairo)
    pub libraries: Option<Vec<String>>,

    /// Triplet override (e.g., arm64-osx)
    pub triplet: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.vcpkg.url.is_some() {
            self.vcpkg.url = other.vcpkg.url;
        }
        if other.vcpkg.libraries.is_some() {
            self.vcpkg.libraries = other.vcpkg.libraries;
        }
        if other.vcpkg.triplet.is_some() {
            self.vcpkg.triplet = other.vcpkg.triplet;
        }
    }

    /// Repository URL to clone vcpkg from.
    pub fn vcpkg_url(&self) -> &str {
        self.vcpkg.url.as_deref().unwrap_or(DEFAULT_VCPKG_URL)
    }

    /// Ports to install.
    pub fn libraries(&self) -> Vec<String> {
        match &self.vcpkg.libraries {
            Some(libraries) => libraries.clone(),
            None => DEFAULT_LIBRARIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Configured triplet override.
    pub fn triplet(&self) -> Option<&str> {
        self.vcpkg.triplet.as_deref()
    }
}

/// Get the global config directory (~/.jucer-deps).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (~/.jucer-deps/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.jucer-deps/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.jucer-deps/config.toml)
/// 2. Global config (~/.jucer-deps/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    // Project config overrides global
    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}
