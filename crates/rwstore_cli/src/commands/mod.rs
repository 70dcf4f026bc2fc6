//! CLI command implementations.

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod split;
pub mod upgrade;

use rwstore_core::RawRecord;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Reads the whole input from `path`, or from stdin if no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e).into()),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Reads a JSON document from the input.
pub fn read_json(path: Option<&Path>) -> Result<Value, Box<dyn std::error::Error>> {
    let text = read_input(path)?;
    serde_json::from_str(&text).map_err(|e| format!("Input is not valid JSON: {}", e).into())
}

/// Reads a stored record (a JSON object) from the input.
pub fn read_record(path: Option<&Path>) -> Result<RawRecord, Box<dyn std::error::Error>> {
    match read_json(path)? {
        Value::Object(source) => Ok(source),
        other => Err(format!(
            "Stored record must be a JSON object, found {}",
            rwstore_codec::shape_name(&other)
        )
        .into()),
    }
}
