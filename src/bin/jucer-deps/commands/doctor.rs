//! `jucer-deps doctor` command

use std::path::Path;

use anyhow::Result;

use jucer_deps::ops::{doctor, format_report};
use jucer_deps::util::BootstrapContext;

pub fn execute(project_dir: &Path, verbose: bool) -> Result<()> {
    let ctx = BootstrapContext::new(project_dir)?;
    let report = doctor(&ctx)?;

    let output = format_report(&report, verbose);
    print!("{}", output);

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
