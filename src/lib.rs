//! jucer-deps - native dependency bootstrapper for Projucer projects
//!
//! This crate clones and builds vcpkg next to a `.jucer` project, installs
//! the configured libraries for the host triplet, stages them at a fixed
//! relative path and patches the project file so every matching exporter
//! links against them.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for jucer-deps unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording command runner and fixture
/// builders for fake vcpkg trees and project files.
#[cfg(test)]
pub mod test_support;

pub use core::{JucerDocument, Platform, Project};
pub use util::context::BootstrapContext;
