//! Test fixtures for common test scenarios.
//!
//! Projucer documents and fake vcpkg trees shaped like the real ones.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Platform, Project};

/// Project with a bare root and one Makefile exporter with a release configuration.
pub const MAKEFILE_JUCER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>

<JUCERPROJECT>
  <EXPORTFORMATS>
    <LINUX_MAKE targetFolder="Builds/LinuxMakefile">
      <CONFIGURATIONS>
        <CONFIGURATION isDebug="0" name="Release"/>
      </CONFIGURATIONS>
    </LINUX_MAKE>
  </EXPORTFORMATS>
</JUCERPROJECT>
"#;

/// Project with an Xcode and a Visual Studio exporter, debug and release each.
pub const MIXED_JUCER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>

<JUCERPROJECT id="Xw3nqQ" name="CairoDemo" projectType="consoleapp" version="1.0.0">
  <MAINGROUP id="mGr" name="CairoDemo">
    <GROUP id="srcGrp" name="Source">
      <FILE id="mainCpp" name="Main.cpp" compile="1" resource="0" file="Source/Main.cpp"/>
    </GROUP>
  </MAINGROUP>
  <EXPORTFORMATS>
    <XCODE_MAC targetFolder="Builds/MacOSX">
      <CONFIGURATIONS>
        <CONFIGURATION isDebug="1" name="Debug"/>
        <CONFIGURATION isDebug="0" name="Release"/>
      </CONFIGURATIONS>
    </XCODE_MAC>
    <VS2022 targetFolder="Builds/VisualStudio2022">
      <CONFIGURATIONS>
        <CONFIGURATION isDebug="1" name="Debug"/>
        <CONFIGURATION isDebug="0" name="Release"/>
      </CONFIGURATIONS>
    </VS2022>
  </EXPORTFORMATS>
</JUCERPROJECT>
"#;

/// Write a `.jucer` file into `dir`.
pub fn write_jucer(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Lay out what `git clone` of vcpkg leaves behind.
pub fn fake_vcpkg_clone(project: &Project, platform: &Platform) {
    let dir = project.vcpkg_dir();
    fs::create_dir_all(dir.join("scripts")).unwrap();
    fs::write(project.bootstrap_script(platform), "#!/bin/sh\n").unwrap();
    fs::write(dir.join(".vcpkg-root"), "").unwrap();
}

/// Create the vcpkg executable the bootstrap script would build.
pub fn fake_vcpkg_build(project: &Project, platform: &Platform) {
    fs::write(project.vcpkg_exe(platform), "").unwrap();
}

/// Populate `installed/<triplet>` with release and debug libraries.
///
/// `libs` holds `(release_name, debug_name)` pairs.
pub fn fake_vcpkg_install(project: &Project, platform: &Platform, libs: &[(&str, &str)]) {
    let installed = project.installed_dir(platform);
    let include = installed.join("include").join("cairo");
    let lib = installed.join("lib");
    let debug_lib = installed.join("debug").join("lib");

    fs::create_dir_all(&include).unwrap();
    fs::create_dir_all(&lib).unwrap();
    fs::create_dir_all(&debug_lib).unwrap();
    fs::write(include.join("cairo.h"), "").unwrap();

    for (release, debug) in libs {
        fs::write(lib.join(release), "").unwrap();
        fs::write(debug_lib.join(debug), "").unwrap();
    }
}

/// Library pairs vcpkg produces for cairo on macOS.
pub fn mac_cairo_libs() -> Vec<(&'static str, &'static str)> {
    vec![("libcairo.a", "libcairod.a"), ("libpixman-1.a", "libpixman-1d.a")]
}

/// Library pairs vcpkg produces for cairo on Windows.
pub fn windows_cairo_libs() -> Vec<(&'static str, &'static str)> {
    vec![
        ("cairo.lib", "cairod.lib"),
        ("libexpatMD.lib", "libexpatdMD.lib"),
    ]
}
