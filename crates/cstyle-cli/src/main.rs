//! cstyle CLI tool.
//!
//! Usage:
//! ```bash
//! cstyle check [OPTIONS] [PATHS]...
//! cstyle list-rules
//! cstyle explain <RULE>
//! cstyle init
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod diff_filter;
mod discovery;

/// Style checker for C and C++ sources
#[derive(Parser)]
#[command(name = "cstyle")]
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
    /// Check source files
    Check(commands::check::CheckArgs),

    /// List available rules
    ListRules,

    /// Describe a rule with an example of conforming code
    Explain {
        /// Rule id or code (e.g. `indentation` or `CS007`)
        rule: String,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// One-line-per-diagnostic compact format.
    Compact,
    /// JSON output.
    Json,
    /// Source excerpts rendered with miette.
    Pretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Check(args) => commands::check::run(&args, cli.config.as_deref()),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(true)
        }
        Commands::Explain { rule } => commands::explain::run(&rule).map(|()| true),
        Commands::Init { force } => {
            commands::init::run(std::path::Path::new(commands::init::CONFIG_NAME), force)
                .map(|()| true)
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}
