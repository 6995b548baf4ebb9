//! conformist CLI tool.
//!
//! Usage:
//! ```bash
//! conformist check [OPTIONS] <INPUT>
//! conformist init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Architectural conformance analyzer for hierarchical dependency graphs
#[derive(Parser)]
#[command(name = "conformist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a dependency graph exported by a language front end
    Check {
        /// Dependency input as JSON
        input: PathBuf,

        /// Project directory used to locate `conformist.toml`
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exception pattern table (overrides `patterns` in config)
        #[arg(long)]
        patterns: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for conformance reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            input,
            project,
            format,
            patterns,
        } => {
            let source = config_resolver::resolve(&project, cli.config.as_deref());
            let conformant =
                commands::check::run(&input, format, patterns.as_deref(), &source)?;
            if !conformant {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
