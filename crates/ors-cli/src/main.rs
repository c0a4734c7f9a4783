//! # ors CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ors_cli::inspect::{
    run_schema, run_unescape, run_url_eq, SchemaArgs, UnescapeArgs, UrlEqArgs,
};
use ors_cli::load_config;
use ors_cli::validate::{run_validate, ValidateArgs};

/// openrouteservice client test toolkit.
///
/// Validates request parameter documents against the client's parameter
/// schema, compares request URLs, and decodes escaped fixture text.
#[derive(Parser, Debug)]
#[command(name = "ors", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML validator configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate parameter documents against the parameter schema.
    Validate(ValidateArgs),

    /// Compare two URLs, ignoring query-parameter order.
    UrlEq(UrlEqArgs),

    /// Decode backslash escape sequences.
    Unescape(UnescapeArgs),

    /// Print the parameter schema as JSON.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
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

    let result = match cli.command {
        Commands::Validate(args) => {
            load_config(cli.config.as_deref()).and_then(|config| run_validate(&args, &config))
        }
        Commands::UrlEq(args) => run_url_eq(&args),
        Commands::Unescape(args) => run_unescape(&args),
        Commands::Schema(args) => run_schema(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
