//! # Validate Subcommand
//!
//! Runs a JSON or YAML document through a model's validation pipeline and
//! prints the sanitized record. Rejected documents print every validation
//! error and exit with code 1.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use enumsan_model::{ModelSchema, ValidationError};

use crate::DefinitionArgs;

/// Arguments for the `enumsan validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub definitions: DefinitionArgs,

    /// Model to validate against.
    #[arg(short, long)]
    pub model: String,

    /// Document to validate; stdin when omitted or `-`.
    #[arg(value_name = "DOCUMENT")]
    pub document: Option<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let defs = args.definitions.load()?;
    let schema = defs.require_model(&args.model)?;
    let text = read_document(args.document.as_deref())?;
    let document = parse_document(&text)?;

    match validate_document(schema, document) {
        Ok(record) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&record).context("failed to serialize record")?
            );
            Ok(0)
        }
        Err(err) => {
            println!("{err}");
            Ok(1)
        }
    }
}

/// Validate a parsed document, returning the sanitized record as JSON.
pub fn validate_document(schema: &ModelSchema, document: Value) -> Result<Value, ValidationError> {
    schema.validate(document).map(|record| record.to_json())
}

/// Parse document text as JSON, falling back to YAML.
pub fn parse_document(text: &str) -> Result<Value> {
    serde_json::from_str::<Value>(text)
        .or_else(|_| serde_yaml::from_str::<Value>(text))
        .context("document is neither valid JSON nor valid YAML")
}

fn read_document(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}
