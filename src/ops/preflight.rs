//! Prerequisite checks run before anything touches the project.

use std::path::PathBuf;

use anyhow::Result;
use thiserror::Error;

use crate::util::process::find_executable;
use crate::util::BootstrapContext;

#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("couldn't find git on PATH")]
    GitNotFound,

    #[error(
        "couldn't find a projucer file in {} - are you running this from the root of the project?",
        dir.display()
    )]
    NoProjectFile { dir: PathBuf },
}

/// Locate the git executable.
pub fn check_git() -> Result<PathBuf> {
    let git = find_executable("git").ok_or(PreflightError::GitNotFound)?;
    tracing::debug!("found git at {}", git.display());
    Ok(git)
}

/// Find the `.jucer` files to patch. At least one is required.
pub fn discover_jucer_files(ctx: &BootstrapContext) -> Result<Vec<PathBuf>> {
    let files = ctx.project().find_jucer_files()?;
    if files.is_empty() {
        return Err(PreflightError::NoProjectFile {
            dir: ctx.project().root().to_path_buf(),
        }
        .into());
    }

    for file in &files {
        tracing::debug!("found project file {}", file.display());
    }
    Ok(files)
}
