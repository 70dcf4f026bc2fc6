//! Inspect command implementation.

use super::read_record;
use rwstore_codec::{shape_name, EncodedValue};
use rwstore_core::{RawRecord, VersionMapping, PROP_TYPE, PROP_VERSION};
use serde::Serialize;
use std::path::Path;

/// Record inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Document type discriminator, if any.
    pub doc_type: Option<String>,
    /// Declared schema version; `None` for records older than version 3.
    pub version: Option<i64>,
    /// Whether the record is in the current schema.
    pub current: bool,
    /// Rewriter class, if readable.
    pub class_name: Option<String>,
    /// Field the config is read from.
    pub config_field: &'static str,
    /// Config layout, if a config is stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigLayout>,
    /// Whether info logging settings are stored.
    pub info_logging: bool,
}

/// How the encoded config is laid out in its field.
#[derive(Debug, Serialize)]
pub struct ConfigLayout {
    /// JSON shape of the field value.
    pub shape: &'static str,
    /// Number of stored elements.
    pub chunks: usize,
    /// Total encoded size in bytes.
    pub total_bytes: usize,
    /// Size of the largest element in bytes.
    pub max_chunk_bytes: usize,
}

/// Inspects a stored record without decoding its config.
pub fn inspect(source: &RawRecord) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let mapping = VersionMapping::resolve(source)?;
    let config = match source.get(mapping.config_field()) {
        None => None,
        Some(value) => {
            let encoded = EncodedValue::try_from(value)?;
            Some(ConfigLayout {
                shape: shape_name(value),
                chunks: encoded.len(),
                total_bytes: encoded.total_bytes(),
                max_chunk_bytes: encoded.max_element_bytes(),
            })
        }
    };

    Ok(InspectResult {
        doc_type: source
            .get(PROP_TYPE)
            .and_then(|v| v.as_str())
            .map(str::to_string),
        version: source.get(PROP_VERSION).and_then(|v| v.as_i64()),
        current: mapping.is_current(),
        class_name: source
            .get(mapping.class_name_field())
            .and_then(|v| v.as_str())
            .map(str::to_string),
        config_field: mapping.config_field(),
        config,
        info_logging: source.contains_key(mapping.info_logging_field()),
    })
}

/// Runs the inspect command.
pub fn run(input: Option<&Path>, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_record(input)?;
    let result = inspect(&source)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("Rewriter Record Inspection");
    println!("==========================");
    println!();
    println!("Type:    {}", result.doc_type.as_deref().unwrap_or("-"));
    match result.version {
        Some(version) => println!("Version: {}", version),
        None => println!("Version: none (pre-3)"),
    }
    println!("Current: {}", if result.current { "yes" } else { "no" });
    println!("Class:   {}", result.class_name.as_deref().unwrap_or("-"));
    println!();
    println!("Config ({}):", result.config_field);
    match &result.config {
        Some(layout) => {
            println!("  Shape:         {}", layout.shape);
            println!("  Chunks:        {}", layout.chunks);
            println!("  Total size:    {} bytes", layout.total_bytes);
            println!("  Largest chunk: {} bytes", layout.max_chunk_bytes);
        }
        None => println!("  (none)"),
    }
    println!();
    println!(
        "Info logging: {}",
        if result.info_logging { "set" } else { "not set" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn inspects_chunked_record() {
        let result = inspect(&record(json!({
            "type": "rewriter",
            "version": 3,
            "class": "CommonRules",
            "config_v_003": ["{\"a\":", "\"bc\"}"]
        })))
        .unwrap();

        assert!(result.current);
        assert_eq!(result.version, Some(3));
        assert_eq!(result.config_field, "config_v_003");
        let layout = result.config.unwrap();
        assert_eq!(layout.shape, "array");
        assert_eq!(layout.chunks, 2);
        assert_eq!(layout.total_bytes, 10);
        assert_eq!(layout.max_chunk_bytes, 5);
    }

    #[test]
    fn inspects_legacy_record() {
        let result = inspect(&record(json!({"class": "Replace", "config": "{}"}))).unwrap();
        assert!(!result.current);
        assert_eq!(result.version, None);
        assert_eq!(result.config_field, "config");
        assert_eq!(result.config.unwrap().shape, "string");
        assert!(!result.info_logging);
    }

    #[test]
    fn record_without_config() {
        let result = inspect(&record(json!({"version": 3, "class": "C"}))).unwrap();
        assert!(result.config.is_none());
    }

    #[test]
    fn unsupported_version_is_an_error() {
        assert!(inspect(&record(json!({"version": 4}))).is_err());
    }
}
