//! # RWStore Codec
//!
//! Chunked string codec for storing rewriter configs in keyword fields.
//!
//! Keyword fields in the search index reject values whose UTF-8 encoding
//! is longer than a fixed number of bytes. Rewriter configs can be much
//! larger than that, so this crate:
//!
//! - Serializes a config object to compact JSON text
//! - Splits the text into chunks that each fit the byte limit
//! - Joins the chunks back and parses the text on read
//!
//! ## Chunking Rules
//!
//! - Text that fits the limit is stored unchanged as a single string
//! - Every chunk is the longest prefix that fits the limit
//! - Chunks never end in the middle of a multi-byte character
//! - Concatenating the chunks in order reproduces the text exactly
//!
//! ## Usage
//!
//! ```
//! use rwstore_codec::{join, split, EncodedValue};
//!
//! let text = "x".repeat(10);
//! let value = split(&text, 4).unwrap();
//! assert_eq!(value.len(), 3);
//! assert_eq!(join(&value), text);
//!
//! assert_eq!(split("short", 32766).unwrap(), EncodedValue::from("short"));
//! ```
//!
//! All functions here are pure and hold no state; they are safe to call
//! from any number of threads.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod value;

pub use decoder::{decode_config_value, join, join_value, parse_config};
pub use encoder::{encode_config, encode_config_chunked, split, MIN_CHUNK_BYTES};
pub use error::{CodecError, CodecResult};
pub use value::{shape_name, EncodedValue};

/// A parsed rewriter config: a string-keyed, arbitrarily nested mapping.
pub type ConfigObject = serde_json::Map<String, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn object(value: Value) -> ConfigObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn roundtrip_small_config() {
        let config = object(json!({"rules": "a =>\n SYNONYM: b", "ignoreCase": true}));
        let value = encode_config_chunked(&config, 32766).unwrap();
        assert!(!value.is_chunked());
        assert_eq!(parse_config(&join(&value)).unwrap(), config);
    }

    #[test]
    fn roundtrip_chunked_config() {
        let rules: String = (0..2_000)
            .map(|i| format!("term{i} =>\n  SYNONYM: größe{i}\n"))
            .collect();
        let config = object(json!({"rules": rules, "nested": {"list": [1, 2, 3]}}));

        let value = encode_config_chunked(&config, 1024).unwrap();
        assert!(value.is_chunked());
        assert!(value.max_element_bytes() <= 1024);

        let stored = value.into_json();
        let decoded = decode_config_value(Some(&stored)).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn roundtrip_empty_config() {
        let value = encode_config_chunked(&ConfigObject::new(), 32766).unwrap();
        assert_eq!(value, EncodedValue::from("{}"));
        assert!(parse_config(&join(&value)).unwrap().is_empty());
    }
}
