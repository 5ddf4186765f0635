//! The full bootstrap pipeline.
//!
//! 1. Preflight: git on PATH, at least one `.jucer` file
//! 2. Clone and build vcpkg
//! 3. Install the configured ports
//! 4. Stage the install tree at `external_libs`
//! 5. Patch every `.jucer` file
//!
//! Every step before patching checks whether its output already exists.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::core::PatchSummary;
use crate::ops::patch::patch_projects;
use crate::ops::preflight::{check_git, discover_jucer_files};
use crate::ops::stage::{normalize_debug_libraries, stage_libraries, StageReport};
use crate::ops::vcpkg::{ensure_vcpkg, install_libraries, VcpkgSetup};
use crate::util::fs::entry_exists;
use crate::util::process::CommandRunner;
use crate::util::BootstrapContext;

/// Summary of a bootstrap run.
#[derive(Debug, Clone, Default)]
pub struct BootstrapReport {
    pub vcpkg: VcpkgSetup,
    pub installed: Vec<String>,
    pub stage: StageReport,
    pub patched: Vec<(PathBuf, PatchSummary)>,
}

/// Run the whole pipeline.
pub fn bootstrap(ctx: &BootstrapContext, runner: &mut dyn CommandRunner) -> Result<BootstrapReport> {
    check_git()?;
    let jucer_files = discover_jucer_files(ctx)?;
    run_steps(ctx, runner, &jucer_files)
}

/// Everything after preflight.
pub(crate) fn run_steps(
    ctx: &BootstrapContext,
    runner: &mut dyn CommandRunner,
    jucer_files: &[PathBuf],
) -> Result<BootstrapReport> {
    let vcpkg = ensure_vcpkg(ctx, runner)?;
    let installed = install_libraries(ctx, runner)?;
    let stage = stage_libraries(ctx)?;
    let patched = patch_projects(ctx, jucer_files)?;

    Ok(BootstrapReport {
        vcpkg,
        installed,
        stage,
        patched,
    })
}

/// Re-apply normalization and patching to an already staged project.
pub fn patch_only(ctx: &BootstrapContext) -> Result<Vec<(PathBuf, PatchSummary)>> {
    let jucer_files = discover_jucer_files(ctx)?;

    let staging = ctx.project().staging_dir();
    if !entry_exists(&staging) {
        bail!(
            "{} does not exist; run `jucer-deps bootstrap` first",
            staging.display()
        );
    }

    normalize_debug_libraries(&ctx.staged_libraries(), ctx.platform())?;
    patch_projects(ctx, &jucer_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::jucer::{HEADER_PATH, RELEASE_LIB_PATH};
    use crate::core::{JucerDocument, Platform, Project};
    use crate::test_support::*;
    use crate::util::process::{find_executable, CommandOutput};
    use crate::util::Config;
    use tempfile::TempDir;

    /// A runner that fakes vcpkg: clone, build and install leave the files
    /// the real tools would.
    fn fake_vcpkg_runner(ctx: &BootstrapContext, libs: Vec<(&'static str, &'static str)>) -> RecordingRunner {
        let mut runner = RecordingRunner::new();

        let (project, platform) = (ctx.project().clone(), ctx.platform().clone());
        runner.expect_pattern(
            CommandExpectation::new(
                CommandPattern::StartsWith("git clone".to_string()),
                CommandOutput::success(Vec::new()),
            )
            .with_effect(move || fake_vcpkg_clone(&project, &platform)),
        );

        let (project, platform) = (ctx.project().clone(), ctx.platform().clone());
        runner.expect_pattern(
            CommandExpectation::new(
                CommandPattern::Contains(ctx.platform().bootstrap_script().to_string()),
                CommandOutput::success(Vec::new()),
            )
            .with_effect(move || fake_vcpkg_build(&project, &platform)),
        );

        let (project, platform) = (ctx.project().clone(), ctx.platform().clone());
        runner.expect_pattern(
            CommandExpectation::new(
                CommandPattern::Contains(" install ".to_string()),
                CommandOutput::success(Vec::new()),
            )
            .with_effect(move || {
                // vcpkg leaves installed ports alone
                if !project.installed_dir(&platform).exists() {
                    fake_vcpkg_install(&project, &platform, &libs);
                }
            }),
        );

        runner
    }

    fn mac_ctx(tmp: &TempDir) -> BootstrapContext {
        BootstrapContext::from_parts(
            Project::new(tmp.path()),
            Platform::new(false),
            Config::default(),
        )
    }

    #[test]
    fn test_full_run_from_empty_project() {
        let tmp = TempDir::new().unwrap();
        let ctx = mac_ctx(&tmp);
        let jucer = write_jucer(tmp.path(), "Demo.jucer", MAKEFILE_JUCER);
        let mut runner = fake_vcpkg_runner(&ctx, vec![("libcairo.a", "libcairod.a")]);

        let report = run_steps(&ctx, &mut runner, &[jucer.clone()]).unwrap();

        assert!(report.vcpkg.cloned);
        assert!(report.vcpkg.built);
        assert_eq!(report.installed, vec!["cairo"]);
        assert!(report.stage.linked);
        assert_eq!(runner.calls().len(), 3);

        let doc = JucerDocument::from_file(&jucer).unwrap();
        assert!(doc.header_paths().unwrap().contains(HEADER_PATH));
        let targets = doc.export_targets().unwrap();
        assert!(targets[0].external_libraries.contains("cairo"));
        assert!(targets[0].configurations[0]
            .library_path
            .contains(RELEASE_LIB_PATH));
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let tmp = TempDir::new().unwrap();
        let ctx = mac_ctx(&tmp);
        let jucer = write_jucer(tmp.path(), "Demo.jucer", MIXED_JUCER);
        let mut runner = fake_vcpkg_runner(&ctx, mac_cairo_libs());

        run_steps(&ctx, &mut runner, &[jucer.clone()]).unwrap();
        let after_first = std::fs::read_to_string(&jucer).unwrap();

        let report = run_steps(&ctx, &mut runner, &[jucer.clone()]).unwrap();
        let after_second = std::fs::read_to_string(&jucer).unwrap();

        assert_eq!(after_first, after_second);
        assert!(!report.vcpkg.cloned);
        assert!(!report.vcpkg.built);
        assert!(!report.patched[0].1.changed());
        // Only `vcpkg install` runs again.
        assert_eq!(runner.calls().len(), 4);
        assert_eq!(
            runner.calls().iter().filter(|c| c.starts_with("git clone")).count(),
            1
        );

        let doc = JucerDocument::from_file(&jucer).unwrap();
        assert_eq!(doc.header_paths().unwrap().len(), 1);
        let xcode = &doc.export_targets().unwrap()[0];
        assert_eq!(xcode.external_libraries.len(), 2);
        assert_eq!(xcode.configurations[0].library_path.len(), 1);
    }

    #[test]
    fn test_install_failure_stops_before_patching() {
        let tmp = TempDir::new().unwrap();
        let ctx = mac_ctx(&tmp);
        fake_vcpkg_clone(ctx.project(), ctx.platform());
        fake_vcpkg_build(ctx.project(), ctx.platform());
        let jucer = write_jucer(tmp.path(), "Demo.jucer", MAKEFILE_JUCER);

        let mut runner = RecordingRunner::new();
        runner.expect_contains(" install ", CommandOutput::failure(1, Vec::new()));

        assert!(run_steps(&ctx, &mut runner, &[jucer.clone()]).is_err());
        assert_eq!(std::fs::read_to_string(&jucer).unwrap(), MAKEFILE_JUCER);
        assert!(!ctx.project().staging_dir().exists());
    }

    #[test]
    fn test_bootstrap_requires_project_file() {
        if find_executable("git").is_none() {
            return;
        }

        let tmp = TempDir::new().unwrap();
        let ctx = mac_ctx(&tmp);
        let mut runner = RecordingRunner::new();

        let err = bootstrap(&ctx, &mut runner).unwrap_err();
        assert!(err.to_string().contains("couldn't find a projucer file"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_patch_only_requires_staging() {
        let tmp = TempDir::new().unwrap();
        let ctx = mac_ctx(&tmp);
        write_jucer(tmp.path(), "Demo.jucer", MAKEFILE_JUCER);

        let err = patch_only(&ctx).unwrap_err();
        assert!(err.to_string().contains("external_libs"));
    }

    #[test]
    fn test_patch_only_patches_staged_project() {
        let tmp = TempDir::new().unwrap();
        let ctx = mac_ctx(&tmp);
        fake_vcpkg_install(ctx.project(), ctx.platform(), &mac_cairo_libs());
        crate::ops::stage::link_install_tree(&ctx).unwrap();
        let jucer = write_jucer(tmp.path(), "Demo.jucer", MAKEFILE_JUCER);

        let results = patch_only(&ctx).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].1.changed());

        let doc = JucerDocument::from_file(&jucer).unwrap();
        let target = &doc.export_targets().unwrap()[0];
        assert_eq!(
            target.external_libraries.iter().collect::<Vec<_>>(),
            vec!["cairo", "pixman-1"]
        );
    }
}
