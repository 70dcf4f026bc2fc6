//! Split command implementation.

use super::read_input;
use rwstore_codec::{split, EncodedValue};
use std::path::Path;
use tracing::debug;

/// Splits `text` into chunks of at most `max_bytes` UTF-8 bytes.
pub fn split_text(text: &str, max_bytes: usize) -> Result<EncodedValue, Box<dyn std::error::Error>> {
    let encoded = split(text, max_bytes)?;
    debug!(
        "Split {} bytes into {} element(s)",
        text.len(),
        encoded.len()
    );
    Ok(encoded)
}

/// Runs the split command.
pub fn run(input: Option<&Path>, max_bytes: usize) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let encoded = split_text(&text, max_bytes)?;
    println!("{}", serde_json::to_string_pretty(&encoded)?);
    Ok(())
}
