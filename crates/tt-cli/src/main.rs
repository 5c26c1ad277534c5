use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tt_cli::commands::{dump, list, rm, start, status, stop};
use tt_cli::{Cli, Commands, Config};
use tt_store::Store;

/// Resolve the store file from configuration and the `--file` override.
fn store_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(file) = &cli.file {
        return Ok(file.clone());
    }
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config.store_path)
}

fn open_store(cli: &Cli) -> Result<Store> {
    let path = store_path(cli)?;
    tracing::debug!(path = %path.display(), "opening store");
    Ok(Store::load(path))
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Start(args)) => {
            let mut store = open_store(&cli)?;
            start::run(&mut store, args)?;
        }
        Some(Commands::Stop(args)) => {
            let mut store = open_store(&cli)?;
            stop::run(&mut store, args)?;
        }
        Some(Commands::Rm(args)) => {
            let mut store = open_store(&cli)?;
            rm::run(&mut store, args)?;
        }
        Some(Commands::List) => {
            let store = open_store(&cli)?;
            list::run(&mut stdout, &store)?;
        }
        Some(Commands::Status) => {
            let store = open_store(&cli)?;
            status::run(&mut stdout, &store)?;
        }
        Some(Commands::Dump) => {
            let store = open_store(&cli)?;
            dump::run(&mut stdout, &store)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
