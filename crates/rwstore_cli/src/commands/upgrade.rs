//! Upgrade command implementation.

use super::read_record;
use rwstore_core::{load_definition, RawRecord};
use std::path::Path;
use tracing::info;

/// Rewrites a stored record in the current schema.
///
/// Returns the new record and whether the input was in an older schema.
pub fn upgrade(
    id: &str,
    source: &RawRecord,
) -> Result<(RawRecord, bool), Box<dyn std::error::Error>> {
    let definition = load_definition(id, source)?;
    let upgraded = definition.to_put_request().to_stored_form()?;
    Ok((upgraded, !definition.mapping.is_current()))
}

/// Runs the upgrade command.
pub fn run(input: Option<&Path>, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_record(input)?;
    let (upgraded, changed) = upgrade(id, &source)?;
    if changed {
        info!("Upgraded rewriter {} to the current schema", id);
    } else {
        info!("Rewriter {} is already in the current schema", id);
    }
    println!("{}", serde_json::to_string_pretty(&upgraded)?);
    Ok(())
}
