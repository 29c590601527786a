//! NetAudio CLI - Command-line interface for networked audio device discovery.
//!
//! Thin display layer over the core library: it wires up the registry, scan
//! statistics and scan engine, then renders the registry's read-only
//! accessors as tables or JSON.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "netaudio_core=debug,netaudio_cli=debug"
    } else {
        "netaudio_core=info,netaudio_cli=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let globals = cli.globals();
    tracing::debug!(?globals, "parsed command line");

    match cli.command {
        Commands::Discover(args) => commands::run_discover(args, &globals).await,
        Commands::Watch(args) => commands::run_watch(args, &globals).await,
        Commands::Interfaces => commands::run_interfaces(&globals),
    }
}
