//! Alerts configurator CLI
//!
//! Reconciles alert policies of the remote alerting service with a
//! configuration file.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} Alerts configurator CLI", "alerts".green().bold());
            println!();
            println!("Run {} for available commands.", "alerts --help".cyan());
            Ok(())
        }
    }
}

/// Logs go to stderr so `--json` output stays parseable.
///
/// `--verbose` shows everything down to DEBUG, otherwise `RUST_LOG`
/// applies with a default of `warn`.
fn init_tracing(verbose: bool) -> Result<()> {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    result.map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {}", e)))?;
    if verbose {
        tracing::debug!("Verbose mode enabled");
    }
    Ok(())
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sync {
            config,
            dry_run,
            json,
            api,
        } => commands::run_sync(&config, &api, dry_run, json),
        Commands::Validate { config } => commands::run_validate(&config),
    }
}
