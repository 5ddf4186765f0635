//! Wiring staged libraries into Projucer files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{JucerDocument, JucerPatch, PatchSummary, Platform};
use crate::util::BootstrapContext;

/// Patch every project file with the libraries currently staged.
pub fn patch_projects(
    ctx: &BootstrapContext,
    jucer_files: &[PathBuf],
) -> Result<Vec<(PathBuf, PatchSummary)>> {
    let library_files = ctx.staged_libraries().library_names()?;
    if library_files.is_empty() {
        tracing::warn!(
            "no {} libraries found under {}",
            ctx.platform().static_lib_ext(),
            ctx.staged_libraries().debug_lib_dir().display()
        );
    }

    let patch = JucerPatch::for_staged(library_files);
    let mut results = Vec::with_capacity(jucer_files.len());

    for path in jucer_files {
        let summary = patch_project(path, &patch, ctx.platform())?;
        results.push((path.clone(), summary));
    }

    Ok(results)
}

/// Apply `patch` to one project file and write it back in place.
pub fn patch_project(path: &Path, patch: &JucerPatch, platform: &Platform) -> Result<PatchSummary> {
    let mut document = JucerDocument::from_file(path)?;
    let summary = document
        .apply(patch, platform)
        .with_context(|| format!("failed to patch {}", path.display()))?;
    document.save(path)?;

    if summary.changed() {
        tracing::info!(
            "Patched {} ({} entries added, targets: {})",
            path.display(),
            summary.entries_added,
            summary.patched_targets.join(", ")
        );
    } else {
        tracing::info!("{} is already up to date", path.display());
    }

    Ok(summary)
}
