//! Command-line interface for parsum
//!
//! clap derive parsing, logging setup and dispatch to the command modules.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
mod output;

pub use output::Output;

#[derive(Parser)]
#[command(
    name = "parsum",
    version = env!("CARGO_PKG_VERSION"),
    about = "Parallel reduction over operation files with independent verification",
    long_about = "parsum reads numbered input files (an operation code followed by numbers), \
                  reduces them on a fixed pool of worker threads, writes the combined total \
                  and re-checks it with an independent sequential pass."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reduce all input files, write the total and verify it
    Run(commands::run::RunArgs),
    /// Verify an existing output file against the inputs
    Verify(commands::verify::VerifyArgs),
    /// Configuration management
    Config(commands::config::ConfigArgs),
}

impl Cli {
    pub async fn run(self, output: &Output) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let config_path = self.config.as_deref();
        match self.command {
            Commands::Run(args) => commands::run::execute(args, config_path, output).await,
            Commands::Verify(args) => commands::verify::execute(args, config_path, output).await,
            Commands::Config(args) => commands::config::execute(args, config_path, output).await,
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // try_init: a subscriber may already be installed when embedded or in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
