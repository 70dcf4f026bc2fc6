//! Chunk joining and config parsing.

use crate::error::{CodecError, CodecResult};
use crate::value::{shape_name, EncodedValue};
use crate::ConfigObject;
use serde_json::Value;

/// Reassemble an encoded value into its config text.
///
/// Chunks are concatenated in order without separator. Leading and
/// trailing whitespace is removed from the result.
pub fn join(value: &EncodedValue) -> String {
    match value {
        EncodedValue::Single(s) => s.trim().to_string(),
        EncodedValue::Chunks(chunks) => chunks.concat().trim().to_string(),
    }
}

/// Reassemble a raw stored field value into config text.
///
/// This is [`join`] applied directly to the JSON value read from a record,
/// without first copying it into an [`EncodedValue`].
///
/// # Errors
///
/// Returns [`CodecError::UnexpectedValueShape`] if the value is not a
/// string or an array of strings.
pub fn join_value(value: &Value) -> CodecResult<String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Array(items) => {
            let mut text = String::new();
            for item in items {
                match item {
                    Value::String(s) => text.push_str(s),
                    other => {
                        return Err(CodecError::unexpected_shape(format!(
                            "array containing {}",
                            shape_name(other)
                        )))
                    }
                }
            }
            Ok(text.trim().to_string())
        }
        other => Err(CodecError::unexpected_shape(shape_name(other))),
    }
}

/// Parse config text into a config object.
///
/// Empty or whitespace-only text means "no configuration" and yields an
/// empty object.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] if the text is not valid JSON or
/// does not hold a JSON object.
pub fn parse_config(text: &str) -> CodecResult<ConfigObject> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(ConfigObject::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CodecError::decoding_failed(format!(
            "expected a JSON object, found {}",
            shape_name(&other)
        ))),
        Err(e) => Err(CodecError::decoding_failed(e.to_string())),
    }
}

/// Join a raw stored field value and parse it into a config object.
///
/// `None` and JSON `null` mean the field is absent and yield an empty
/// object.
///
/// # Errors
///
/// Propagates errors from [`join_value`] and [`parse_config`].
pub fn decode_config_value(value: Option<&Value>) -> CodecResult<ConfigObject> {
    match value {
        None | Some(Value::Null) => Ok(ConfigObject::new()),
        Some(value) => parse_config(&join_value(value)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_single_trims() {
        assert_eq!(join(&EncodedValue::from("  {} \n")), "{}");
    }

    #[test]
    fn join_chunks_concatenates_in_order() {
        let value = EncodedValue::from(vec![" {\"a\":".to_string(), "1} ".to_string()]);
        assert_eq!(join(&value), "{\"a\":1}");
    }

    #[test]
    fn join_value_accepts_string_and_array() {
        assert_eq!(join_value(&json!(" x ")).unwrap(), "x");
        assert_eq!(join_value(&json!(["a", "b", "c"])).unwrap(), "abc");
        assert_eq!(join_value(&json!([])).unwrap(), "");
    }

    #[test]
    fn join_value_rejects_other_shapes() {
        assert_eq!(
            join_value(&json!(true)).unwrap_err(),
            CodecError::unexpected_shape("boolean")
        );
        assert_eq!(
            join_value(&json!(["a", null])).unwrap_err(),
            CodecError::unexpected_shape("array containing null")
        );
    }

    #[test]
    fn parse_config_reads_objects() {
        let config = parse_config(r#"{"a":1,"b":{"c":"d"}}"#).unwrap();
        assert_eq!(config.get("a"), Some(&json!(1)));
        assert_eq!(config.get("b"), Some(&json!({"c": "d"})));
    }

    #[test]
    fn parse_config_empty_is_empty_object() {
        assert!(parse_config("").unwrap().is_empty());
        assert!(parse_config("  \t\n").unwrap().is_empty());
    }

    #[test]
    fn parse_config_rejects_garbage() {
        let err = parse_config("{\"a\":").unwrap_err();
        assert!(matches!(err, CodecError::DecodingFailed { .. }));
    }

    #[test]
    fn parse_config_rejects_non_objects() {
        let err = parse_config("[1, 2]").unwrap_err();
        assert_eq!(
            err,
            CodecError::decoding_failed("expected a JSON object, found array")
        );
    }

    #[test]
    fn decode_split_object() {
        let config = decode_config_value(Some(&json!(["{\"a\":1", "}"]))).unwrap();
        assert_eq!(Value::Object(config), json!({"a": 1}));
    }

    #[test]
    fn decode_absent_or_null_is_empty() {
        assert!(decode_config_value(None).unwrap().is_empty());
        assert!(decode_config_value(Some(&Value::Null)).unwrap().is_empty());
        assert!(decode_config_value(Some(&json!("   "))).unwrap().is_empty());
    }
}
