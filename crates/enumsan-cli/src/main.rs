//! # enumsan CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use enumsan_cli::sanitize::{run_sanitize, SanitizeArgs};
use enumsan_cli::schema::{run_schema, SchemaArgs};
use enumsan_cli::validate::{run_validate, ValidateArgs};

/// enumsan: enum-sanitizing model validation.
///
/// Declares enumerations and models in a YAML definition file, then prints
/// model schemas, validates documents, or sanitizes single values. Enum
/// fields accept a member name or integer value and always come out as the
/// member name.
#[derive(Parser, Debug)]
#[command(name = "enumsan", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a model's JSON Schema.
    Schema(SchemaArgs),

    /// Validate a JSON or YAML document against a model.
    Validate(ValidateArgs),

    /// Normalize one value against an enumeration.
    Sanitize(SanitizeArgs),
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

    let result = match cli.command {
        Commands::Schema(args) => run_schema(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::Sanitize(args) => run_sanitize(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
