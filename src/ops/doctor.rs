//! Environment and project health checks.
//!
//! The `doctor` command reports, without changing anything, whether the
//! prerequisites are met and how far the bootstrap pipeline has progressed.
//!
//! ## Checks Performed
//!
//! - Git availability (required)
//! - Projucer files in the project root (required)
//! - vcpkg clone and executable
//! - Staged libraries at `external_libs`

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::util::fs::entry_exists;
use crate::util::process::find_executable;
use crate::util::BootstrapContext;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool or file (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Environment information
    pub environment: HashMap<String, String>,
}

impl DoctorReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        DoctorReport::default()
    }

    /// Add a check result.
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Get the count of passed checks.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get the count of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get the count of required failed checks.
    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

/// Run every check against the project in `ctx`.
pub fn doctor(ctx: &BootstrapContext) -> Result<DoctorReport> {
    let start = Instant::now();
    let mut report = DoctorReport::new();

    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report
        .environment
        .insert("arch".to_string(), std::env::consts::ARCH.to_string());
    report
        .environment
        .insert("platform".to_string(), ctx.platform().to_string());
    report.environment.insert(
        "project".to_string(),
        ctx.project().root().display().to_string(),
    );

    report.add(check_git());
    report.add(check_jucer_files(ctx));
    report.add(check_vcpkg_clone(ctx));
    report.add(check_vcpkg_exe(ctx));
    report.add(check_staged_libraries(ctx));

    report.total_duration = start.elapsed();
    Ok(report)
}

/// Check for git.
fn check_git() -> CheckResult {
    let start = Instant::now();

    let Some(path) = find_executable("git") else {
        return CheckResult::fail("Git", "Git not found (required to clone vcpkg)")
            .with_duration(start.elapsed());
    };

    let mut result = CheckResult::pass("Git", "Git is available").with_path(path);
    if let Ok(output) = Command::new("git").arg("--version").output() {
        if output.status.success() {
            result = result.with_version(String::from_utf8_lossy(&output.stdout).trim());
        }
    }
    result.with_duration(start.elapsed())
}

/// Check for Projucer files.
fn check_jucer_files(ctx: &BootstrapContext) -> CheckResult {
    let start = Instant::now();

    match ctx.project().find_jucer_files() {
        Ok(files) if !files.is_empty() => {
            let names: Vec<String> = files
                .iter()
                .filter_map(|f| f.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            CheckResult::pass("Projucer files", format!("Found {}", names.join(", ")))
                .with_duration(start.elapsed())
        }
        Ok(_) => CheckResult::fail(
            "Projucer files",
            format!("No .jucer file in {}", ctx.project().root().display()),
        )
        .with_duration(start.elapsed()),
        Err(e) => CheckResult::fail("Projucer files", format!("{:#}", e))
            .with_duration(start.elapsed()),
    }
}

/// Check for the vcpkg clone.
fn check_vcpkg_clone(ctx: &BootstrapContext) -> CheckResult {
    let dir = ctx.project().vcpkg_dir();
    if dir.is_dir() {
        CheckResult::pass("vcpkg clone", "vcpkg is cloned")
            .with_path(dir)
            .optional()
    } else {
        CheckResult::fail("vcpkg clone", "vcpkg is not cloned yet (run bootstrap)").optional()
    }
}

/// Check for the built vcpkg executable.
fn check_vcpkg_exe(ctx: &BootstrapContext) -> CheckResult {
    let exe = ctx.project().vcpkg_exe(ctx.platform());
    if exe.is_file() {
        CheckResult::pass("vcpkg executable", "vcpkg is built")
            .with_path(exe)
            .optional()
    } else {
        CheckResult::fail("vcpkg executable", "vcpkg is not built yet (run bootstrap)").optional()
    }
}

/// Check for staged libraries.
fn check_staged_libraries(ctx: &BootstrapContext) -> CheckResult {
    let staged = ctx.staged_libraries();
    if !entry_exists(staged.root()) {
        return CheckResult::fail(
            "Staged libraries",
            format!("{} does not exist (run bootstrap)", staged.root().display()),
        )
        .optional();
    }

    match staged.library_names() {
        Ok(names) if !names.is_empty() => CheckResult::pass(
            "Staged libraries",
            format!("{} libraries for {}", names.len(), ctx.platform().triplet),
        )
        .with_path(staged.root().to_path_buf())
        .optional(),
        Ok(_) => CheckResult::fail(
            "Staged libraries",
            format!("no libraries under {}", staged.debug_lib_dir().display()),
        )
        .optional(),
        Err(e) => CheckResult::fail("Staged libraries", format!("{:#}", e)).optional(),
    }
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    writeln!(output, "jucer-deps doctor").unwrap();
    writeln!(output, "=================\n").unwrap();

    let unknown = "unknown".to_string();
    writeln!(output, "Environment:").unwrap();
    writeln!(
        output,
        "  Platform: {}",
        report.environment.get("platform").unwrap_or(&unknown)
    )
    .unwrap();
    if verbose {
        writeln!(
            output,
            "  OS: {} ({})",
            report.environment.get("os").unwrap_or(&unknown),
            report.environment.get("arch").unwrap_or(&unknown)
        )
        .unwrap();
        writeln!(
            output,
            "  Project: {}",
            report.environment.get("project").unwrap_or(&unknown)
        )
        .unwrap();
    }
    writeln!(output).unwrap();

    writeln!(output, "Checks:").unwrap();
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };

        writeln!(output, "  {} {}{}", status, check.name, required).unwrap();

        if verbose || !check.passed {
            writeln!(output, "      {}", check.message).unwrap();
        }
        if verbose {
            if let Some(path) = &check.path {
                writeln!(output, "      Path: {}", path.display()).unwrap();
            }
            if let Some(version) = &check.version {
                writeln!(output, "      Version: {}", version).unwrap();
            }
            writeln!(output, "      Time: {:.1?}", check.duration).unwrap();
        }
    }

    writeln!(output).unwrap();

    let passed = report.passed_count();
    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    write!(output, "Summary: {} passed, {} failed", passed, failed).unwrap();
    if verbose {
        write!(output, " in {:.1?}", report.total_duration).unwrap();
    }
    writeln!(output).unwrap();

    if required_failed > 0 {
        writeln!(
            output,
            "\nWarning: {} required check(s) failed. Bootstrap will not run.",
            required_failed
        )
        .unwrap();
    } else if failed > 0 {
        writeln!(
            output,
            "\nAll required checks passed. Run `jucer-deps bootstrap` to finish setup."
        )
        .unwrap();
    } else {
        writeln!(output, "\nAll checks passed. The project is ready to build.").unwrap();
    }

    output
}
