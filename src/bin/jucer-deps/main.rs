//! jucer-deps CLI - bootstraps native dependencies for a Projucer project

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("jucer_deps=debug")
    } else if cli.quiet {
        EnvFilter::new("jucer_deps=warn")
    } else {
        EnvFilter::new("jucer_deps=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command.unwrap_or(Commands::Bootstrap) {
        Commands::Bootstrap => commands::bootstrap::execute(&cli.project_dir),
        Commands::Patch => commands::patch::execute(&cli.project_dir),
        Commands::Doctor => commands::doctor::execute(&cli.project_dir, cli.verbose),
    }
}
