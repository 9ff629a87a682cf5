//! # Schema Subcommand
//!
//! Prints the JSON Schema of one model from a definition file.

use anyhow::{Context, Result};
use clap::Args;

use crate::definition::Definitions;
use crate::DefinitionArgs;

/// Arguments for the `enumsan schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[command(flatten)]
    pub definitions: DefinitionArgs,

    /// Model to describe.
    #[arg(short, long)]
    pub model: String,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let defs = args.definitions.load()?;
    println!("{}", render_schema(&defs, &args.model)?);
    Ok(0)
}

/// Pretty-printed JSON Schema for `model`.
pub fn render_schema(defs: &Definitions, model: &str) -> Result<String> {
    let schema = defs.require_model(model)?.json_schema();
    serde_json::to_string_pretty(&schema).context("failed to serialize schema")
}
