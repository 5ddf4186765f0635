//! `jucer-deps patch` command

use std::path::Path;

use anyhow::Result;

use jucer_deps::ops::patch_only;
use jucer_deps::util::BootstrapContext;

pub fn execute(project_dir: &Path) -> Result<()> {
    let ctx = BootstrapContext::new(project_dir)?;
    patch_only(&ctx)?;
    Ok(())
}
