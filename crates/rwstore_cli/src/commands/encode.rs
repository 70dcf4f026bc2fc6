//! Encode command implementation.

use super::read_json;
use rwstore_core::{to_stored_form, RawRecord};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Builds the stored record for a put payload.
pub fn encode(payload: &Value) -> Result<RawRecord, Box<dyn std::error::Error>> {
    let source = to_stored_form(payload)?;
    debug!("Encoded record with {} fields", source.len());
    Ok(source)
}

/// Runs the encode command.
pub fn run(input: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let payload = read_json(input)?;
    let source = encode(&payload)?;
    println!("{}", serde_json::to_string_pretty(&source)?);
    Ok(())
}
