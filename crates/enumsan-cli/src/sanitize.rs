//! # Sanitize Subcommand
//!
//! Normalizes a single value against an enumeration from a definition file.
//! The value is read as a JSON literal (`2`, `"RED"`, `[1, "BLUE"]`); text
//! that is not JSON is taken as a bare name.

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use enumsan_core::{sanitize, EnumError, EnumType, FieldValue};

use crate::DefinitionArgs;

/// Arguments for the `enumsan sanitize` subcommand.
#[derive(Args, Debug)]
pub struct SanitizeArgs {
    #[command(flatten)]
    pub definitions: DefinitionArgs,

    /// Enumeration to sanitize against.
    #[arg(short, long = "enum", value_name = "NAME")]
    pub enum_name: String,

    /// Value to sanitize.
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,
}

/// Execute the sanitize subcommand.
///
/// Returns exit code: 0 on success, 1 when the value is not a member.
pub fn run_sanitize(args: &SanitizeArgs) -> Result<u8> {
    let defs = args.definitions.load()?;
    let ty = defs.require_enum(&args.enum_name)?;

    match sanitize_literal(ty, &args.value) {
        Ok(clean) => {
            println!("{clean}");
            Ok(0)
        }
        Err(err) => {
            println!("{err}");
            Ok(1)
        }
    }
}

/// Sanitize `literal` against `ty`, returning the result as JSON.
pub fn sanitize_literal(ty: &EnumType, literal: &str) -> Result<Value, EnumError> {
    let raw = serde_json::from_str::<Value>(literal)
        .map(FieldValue::from)
        .unwrap_or_else(|_| FieldValue::from(literal));
    sanitize(&raw, ty).map(|clean| clean.to_json())
}
