//! Package loader CLI
//!
//! The command-line interface for discovering packages, resolving their
//! assets and running their lifecycle hooks.

mod cli;
mod commands;
mod context;
mod error;

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use pkg_core::Operation;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::{LoaderOptions, open_loader};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = LoaderOptions::from(&cli);
    match cli.command {
        Some(cmd) => execute_command(cmd, &options),
        None => {
            // No command provided - show help hint
            println!("{} Package loader CLI", "pkg".green().bold());
            println!();
            println!("Run {} for available commands.", "pkg --help".cyan());
            Ok(())
        }
    }
}

/// `--verbose` forces DEBUG; otherwise `RUST_LOG` decides, defaulting to warn.
fn init_tracing(verbose: bool) {
    let builder = tracing_subscriber::fmt().with_writer(io::stderr);
    let result = if verbose {
        builder
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .try_init()
    } else {
        builder
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_target(false)
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!("Verbose mode enabled");
    }
}

fn execute_command(cmd: Commands, options: &LoaderOptions) -> Result<()> {
    if let Commands::Completions { shell } = cmd {
        clap_complete::generate(shell, &mut Cli::command(), "pkg", &mut io::stdout());
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let loader = open_loader(&cwd, options)?;

    match cmd {
        Commands::List { root_name, json } => {
            commands::run_list(&loader, root_name.as_deref(), json)
        }
        Commands::Show { slug, json } => commands::run_show(&loader, &slug, json),
        Commands::Config {
            slug,
            path,
            default,
            inherited,
        } => commands::run_config(
            &loader,
            &slug,
            path.as_deref(),
            default.as_deref(),
            inherited,
        ),
        Commands::Asset { slug, path } => commands::run_asset(&loader, &slug, &path),
        Commands::ClearAssets { slug } => commands::run_clear_assets(&loader, &slug),
        Commands::Refresh { slug } => commands::run_refresh(&loader, &slug),
        Commands::Install { slug } => commands::run_operation(&loader, &slug, Operation::Install),
        Commands::Uninstall { slug } => {
            commands::run_operation(&loader, &slug, Operation::Uninstall)
        }
        Commands::Execute { slug } => commands::run_operation(&loader, &slug, Operation::Execute),
        Commands::Upgrade { slug } => commands::run_operation(&loader, &slug, Operation::Upgrade),
        Commands::Autoload { slug, json } => commands::run_autoload(&loader, &slug, json),
        Commands::Completions { .. } => Ok(()),
    }
}
