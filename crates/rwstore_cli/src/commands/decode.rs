//! Decode command implementation.

use super::read_record;
use rwstore_core::{load_definition, RawRecord, RewriterDefinition};
use std::path::Path;
use tracing::debug;

/// Reads a stored record of any supported schema version.
pub fn decode(id: &str, source: &RawRecord) -> Result<RewriterDefinition, Box<dyn std::error::Error>> {
    let definition = load_definition(id, source)?;
    debug!("Decoded {} with {:?} mapping", id, definition.mapping);
    Ok(definition)
}

/// Runs the decode command.
pub fn run(input: Option<&Path>, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_record(input)?;
    let definition = decode(id, &source)?;
    println!("{}", serde_json::to_string_pretty(&definition)?);
    Ok(())
}
