//! Run context.
//!
//! Everything a run depends on that comes from the environment (project
//! root, host platform, configuration) is resolved once here and passed
//! explicitly to every operation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{Platform, Project, StagedLibraries};
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Context shared by every step of a run.
#[derive(Debug, Clone)]
pub struct BootstrapContext {
    project: Project,
    platform: Platform,
    config: Config,
}

impl BootstrapContext {
    /// Resolve the context for a project directory.
    pub fn new(project_root: impl AsRef<Path>) -> Result<Self> {
        let root = absolute(project_root.as_ref())?;

        let global = global_config_path();
        let config = load_config(global.as_deref(), &project_config_path(&root));

        let mut platform = Platform::detect(&root);
        if let Some(triplet) = config.triplet() {
            platform = platform.with_triplet(triplet);
        }

        tracing::debug!("project root: {}", root.display());
        tracing::debug!("platform: {}", platform);

        Ok(BootstrapContext {
            project: Project::new(root),
            platform,
            config,
        })
    }

    /// Create a context from already resolved parts.
    pub fn from_parts(project: Project, platform: Platform, config: Config) -> Self {
        BootstrapContext {
            project,
            platform,
            config,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The staged library tree at `external_libs`.
    pub fn staged_libraries(&self) -> StagedLibraries {
        StagedLibraries::new(self.project.staging_dir(), &self.platform)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("failed to resolve project directory {}", path.display()))
}
