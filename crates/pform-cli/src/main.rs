//! # pform CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pform_cli::calculate::{run_calculate, CalculateArgs};
use pform_cli::catalog::{run_catalog, CatalogArgs};
use pform_cli::render::{run_render, RenderArgs};
use pform_cli::finish;

/// Penalty form toolkit: catalogs, penalty calculation, and PDF notices.
#[derive(Parser, Debug)]
#[command(name = "pform", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print breaches, occurrence counts, or penalty tiers as JSON.
    Catalog(CatalogArgs),

    /// Calculate the penalty for a base fine and an occurrence count.
    Calculate(CalculateArgs),

    /// Validate a form file and write its penalty notice as PDF.
    Render(RenderArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Catalog(args) => run_catalog(&args, &mut out),
        Commands::Calculate(args) => run_calculate(&args, &mut out),
        Commands::Render(args) => run_render(&args, &mut out),
    };

    match finish(result, &mut out) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
