//! `jucer-deps bootstrap` command

use std::path::Path;

use anyhow::Result;

use jucer_deps::ops::bootstrap;
use jucer_deps::util::{BootstrapContext, ShellRunner};

pub fn execute(project_dir: &Path) -> Result<()> {
    let ctx = BootstrapContext::new(project_dir)?;

    let mut runner = ShellRunner::new(ctx.project().root());
    let report = bootstrap(&ctx, &mut runner)?;

    let changed = report.patched.iter().filter(|(_, s)| s.changed()).count();
    tracing::info!(
        "Done: {} libraries installed, {} of {} project files updated",
        report.installed.len(),
        changed,
        report.patched.len()
    );

    Ok(())
}
