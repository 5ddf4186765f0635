//! Library staging.
//!
//! The installed triplet tree is exposed at `external_libs` so the project
//! file can use fixed relative paths, then debug library names are brought
//! in line with the release names.

use std::fs;

use anyhow::{Context, Result};

use crate::core::library::{strip_debug_suffix, RENAME_RULES};
use crate::core::{Platform, StagedLibraries};
use crate::util::fs::{entry_exists, symlink};
use crate::util::BootstrapContext;

/// A debug library rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Outcome of normalizing the debug library directory.
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    /// Files renamed to their release names
    pub renamed: Vec<Rename>,
    /// Debug files that follow no known naming convention
    pub flagged: Vec<String>,
}

/// Outcome of staging.
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    /// Whether the `external_libs` link was created by this run
    pub linked: bool,
    pub normalize: NormalizeReport,
}

/// Link the install tree and normalize debug library names.
pub fn stage_libraries(ctx: &BootstrapContext) -> Result<StageReport> {
    let linked = link_install_tree(ctx)?;
    let normalize = normalize_debug_libraries(&ctx.staged_libraries(), ctx.platform())?;
    Ok(StageReport { linked, normalize })
}

/// Create `external_libs` pointing at `vcpkg/installed/<triplet>`.
///
/// An existing entry is reused as is, wherever it points.
pub fn link_install_tree(ctx: &BootstrapContext) -> Result<bool> {
    let staging = ctx.project().staging_dir();
    if entry_exists(&staging) {
        tracing::debug!("reusing {}", staging.display());
        return Ok(false);
    }

    let installed = ctx.project().installed_dir(ctx.platform());
    symlink(&installed, &staging).with_context(|| {
        format!(
            "failed to link {} to {}",
            staging.display(),
            installed.display()
        )
    })?;
    tracing::debug!("linked {} -> {}", staging.display(), installed.display());

    Ok(true)
}

/// Rename debug libraries so they carry the release file names.
///
/// Projucer cannot name different libraries per configuration, so
/// `libcairod.a` in `debug/lib` becomes `libcairo.a`.
pub fn normalize_debug_libraries(
    staged: &StagedLibraries,
    platform: &Platform,
) -> Result<NormalizeReport> {
    let mut report = NormalizeReport::default();
    let debug_dir = staged.debug_lib_dir();
    if !debug_dir.is_dir() {
        tracing::debug!("no debug libraries at {}", debug_dir.display());
        return Ok(report);
    }

    for rule in RENAME_RULES.iter().filter(|r| r.applies_to(platform)) {
        if debug_dir.join(rule.from).is_file() && rename_library(staged, rule.from, rule.to)? {
            report.renamed.push(Rename {
                from: rule.from.to_string(),
                to: rule.to.to_string(),
            });
        }
    }

    let release_known = staged.lib_dir().is_dir();
    for name in staged.library_names()? {
        // Already carries a release name (possibly one that ends in `d`).
        if staged.has_release(&name) {
            continue;
        }

        match strip_debug_suffix(&name, staged.ext()) {
            Some(normalized) => {
                if rename_library(staged, &name, &normalized)? {
                    report.renamed.push(Rename {
                        from: name,
                        to: normalized,
                    });
                }
            }
            None if release_known => {
                tracing::warn!(
                    "debug library {} has no debug suffix and no release counterpart; left as is",
                    name
                );
                report.flagged.push(name);
            }
            None => {}
        }
    }

    Ok(report)
}

/// Rename within the debug directory. Returns false if the target exists.
fn rename_library(staged: &StagedLibraries, from: &str, to: &str) -> Result<bool> {
    let dir = staged.debug_lib_dir();
    let source = dir.join(from);
    let target = dir.join(to);

    if target.exists() {
        tracing::warn!(
            "not renaming {}: {} already exists",
            source.display(),
            target.display()
        );
        return Ok(false);
    }

    fs::rename(&source, &target).with_context(|| {
        format!(
            "failed to rename {} to {}",
            source.display(),
            target.display()
        )
    })?;
    tracing::debug!("renamed {} -> {}", from, to);

    Ok(true)
}
