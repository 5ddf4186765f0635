//! High-level operations.
//!
//! This module contains the implementation of the jucer-deps commands.

pub mod bootstrap;
pub mod doctor;
pub mod patch;
pub mod preflight;
pub mod stage;
pub mod vcpkg;

pub use bootstrap::{bootstrap, patch_only, BootstrapReport};
pub use doctor::{doctor, format_report, CheckResult, DoctorReport};
pub use patch::{patch_project, patch_projects};
pub use preflight::{check_git, discover_jucer_files, PreflightError};
pub use stage::{link_install_tree, normalize_debug_libraries, stage_libraries, StageReport};
pub use vcpkg::{ensure_vcpkg, install_libraries, VcpkgSetup};
