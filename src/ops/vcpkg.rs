//! vcpkg bootstrap and port installation.
//!
//! vcpkg is cloned into `<project>/vcpkg` and built in place with its own
//! bootstrap script. Both steps are skipped when their output already
//! exists, so re-running only repeats `vcpkg install`, which is itself a
//! no-op for installed ports.

use anyhow::Result;

use crate::core::project::VCPKG_DIR;
use crate::util::fs::grant_full_permissions;
use crate::util::process::{shell_quote, CommandRunner, RunOptions};
use crate::util::BootstrapContext;

/// What `ensure_vcpkg` had to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VcpkgSetup {
    pub cloned: bool,
    pub built: bool,
}

/// Make sure vcpkg is cloned and built.
pub fn ensure_vcpkg(ctx: &BootstrapContext, runner: &mut dyn CommandRunner) -> Result<VcpkgSetup> {
    Ok(VcpkgSetup {
        cloned: clone_vcpkg(ctx, runner)?,
        built: build_vcpkg(ctx, runner)?,
    })
}

/// Clone vcpkg unless the directory exists. Returns whether it cloned.
pub fn clone_vcpkg(ctx: &BootstrapContext, runner: &mut dyn CommandRunner) -> Result<bool> {
    let dir = ctx.project().vcpkg_dir();
    if dir.exists() {
        tracing::debug!("vcpkg already cloned at {}", dir.display());
        return Ok(false);
    }

    tracing::info!("Cloning vcpkg");
    let command = format!("git clone {} {}", shell_quote(ctx.config().vcpkg_url()), VCPKG_DIR);
    runner.run(&command, RunOptions::default())?;

    // Some checkouts come out without the execute bit on the bootstrap scripts.
    let count = grant_full_permissions(&dir)?;
    tracing::debug!("granted full permissions on {} entries", count);

    Ok(true)
}

/// Build the vcpkg executable unless it exists. Returns whether it built.
pub fn build_vcpkg(ctx: &BootstrapContext, runner: &mut dyn CommandRunner) -> Result<bool> {
    let exe = ctx.project().vcpkg_exe(ctx.platform());
    if exe.exists() {
        tracing::debug!("vcpkg already built at {}", exe.display());
        return Ok(false);
    }

    tracing::info!("Building vcpkg");
    let script = ctx.project().bootstrap_script(ctx.platform());
    runner.run(&shell_quote(script.to_string_lossy()), RunOptions::default())?;

    Ok(true)
}

/// Install every configured port for the platform triplet.
pub fn install_libraries(
    ctx: &BootstrapContext,
    runner: &mut dyn CommandRunner,
) -> Result<Vec<String>> {
    tracing::info!("Downloading required libraries");

    let exe = ctx.project().vcpkg_exe(ctx.platform());
    let libraries = ctx.config().libraries();

    for library in &libraries {
        let command = install_command(&exe.to_string_lossy(), library, &ctx.platform().triplet);
        runner.run(&command, RunOptions::default())?;
    }

    Ok(libraries)
}

/// `vcpkg install <library> --triplet=<triplet>`
pub fn install_command(vcpkg: &str, library: &str, triplet: &str) -> String {
    format!(
        "{} install {} {}",
        shell_quote(vcpkg),
        shell_quote(library),
        shell_quote(format!("--triplet={}", triplet))
    )
}
