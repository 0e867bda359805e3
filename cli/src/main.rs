#![deny(missing_docs)]

//! # Routegen CLI
//!
//! Command Line Interface for the OpenAPI-to-route-binding compiler.
//!
//! Supported Commands:
//! - `generate`: OpenAPI + handler sources -> route bindings, dispatch map, HTML reference.
//! - `routes`: Prints the computed route table.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use routegen_core::AppResult;
use tracing_subscriber::EnvFilter;

mod config;
mod generate;
mod routes;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI route binding generator")]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate route bindings, dispatch map and documentation.
    Generate(generate::GenerateArgs),
    /// Print the route table computed from an OpenAPI document.
    Routes(routes::RoutesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> AppResult<()> {
    match &cli.command {
        Commands::Generate(args) => generate::execute(args),
        Commands::Routes(args) => routes::execute(args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
