//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// jucer-deps - fetch, build and wire native libraries into a Projucer project
#[derive(Parser)]
#[command(name = "jucer-deps")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project root containing the .jucer file
    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = ".",
        env = "JUCER_DEPS_PROJECT_DIR"
    )]
    pub project_dir: PathBuf,

    /// Defaults to `bootstrap`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clone and build vcpkg, install libraries and patch the project (default)
    Bootstrap,

    /// Re-patch the project against the already staged libraries
    Patch,

    /// Check the environment and report pipeline state
    Doctor,
}
