//! # enumsan-cli: Command-Line Front End
//!
//! Loads enumeration and model definitions from a YAML file and exposes the
//! model layer on the command line.
//!
//! ## Subcommands
//!
//! - `schema`: print a model's JSON Schema
//! - `validate`: validate a JSON or YAML document against a model
//! - `sanitize`: normalize one value against an enumeration
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; validation semantics live in
//!   `enumsan-model`.
//! - Handlers return an exit code: 0 success, 1 rejected input. Operational
//!   failures are errors, reported by the binary with exit code 2.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

pub mod definition;
pub mod sanitize;
pub mod schema;
pub mod validate;

pub use definition::{load_definitions, parse_definitions, Definitions};

/// Definition file flag shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct DefinitionArgs {
    /// YAML file declaring enums and models.
    #[arg(short, long, value_name = "FILE")]
    pub definitions: PathBuf,
}

impl DefinitionArgs {
    pub fn load(&self) -> Result<Definitions> {
        load_definitions(&self.definitions)
    }
}
