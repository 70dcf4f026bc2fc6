//! Stored shape of an encoded config string.

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A config string as it is written to a keyword field.
///
/// Short strings are stored as-is. Strings whose UTF-8 encoding exceeds
/// the field limit are stored as an ordered array of chunks, each of which
/// fits the limit on its own. Serializes to a JSON string or a JSON array
/// of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncodedValue {
    /// The whole string fits in one field value.
    Single(String),
    /// Ordered chunks, concatenated without separator on read.
    Chunks(Vec<String>),
}

impl EncodedValue {
    /// Returns true if the value was split into chunks.
    pub fn is_chunked(&self) -> bool {
        matches!(self, EncodedValue::Chunks(_))
    }

    /// Number of stored elements (1 for a single string).
    pub fn len(&self) -> usize {
        match self {
            EncodedValue::Single(_) => 1,
            EncodedValue::Chunks(chunks) => chunks.len(),
        }
    }

    /// Returns true if there are no stored elements at all.
    pub fn is_empty(&self) -> bool {
        match self {
            EncodedValue::Single(_) => false,
            EncodedValue::Chunks(chunks) => chunks.is_empty(),
        }
    }

    /// Iterate over the stored elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            EncodedValue::Single(s) => std::slice::from_ref(s),
            EncodedValue::Chunks(chunks) => chunks,
        };
        slice.iter().map(String::as_str)
    }

    /// Largest UTF-8 byte length among the stored elements.
    pub fn max_element_bytes(&self) -> usize {
        self.iter().map(str::len).max().unwrap_or(0)
    }

    /// Total UTF-8 byte length of all elements.
    pub fn total_bytes(&self) -> usize {
        self.iter().map(str::len).sum()
    }

    /// Convert into the JSON value written to the record.
    pub fn into_json(self) -> Value {
        match self {
            EncodedValue::Single(s) => Value::String(s),
            EncodedValue::Chunks(chunks) => {
                Value::Array(chunks.into_iter().map(Value::String).collect())
            }
        }
    }
}

impl From<String> for EncodedValue {
    fn from(s: String) -> Self {
        EncodedValue::Single(s)
    }
}

impl From<&str> for EncodedValue {
    fn from(s: &str) -> Self {
        EncodedValue::Single(s.to_string())
    }
}

impl From<Vec<String>> for EncodedValue {
    fn from(chunks: Vec<String>) -> Self {
        EncodedValue::Chunks(chunks)
    }
}

impl From<EncodedValue> for Value {
    fn from(value: EncodedValue) -> Self {
        value.into_json()
    }
}

impl TryFrom<&Value> for EncodedValue {
    type Error = CodecError;

    fn try_from(value: &Value) -> CodecResult<Self> {
        match value {
            Value::String(s) => Ok(EncodedValue::Single(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(CodecError::unexpected_shape(format!(
                        "array containing {}",
                        shape_name(other)
                    ))),
                })
                .collect::<CodecResult<Vec<_>>>()
                .map(EncodedValue::Chunks),
            other => Err(CodecError::unexpected_shape(shape_name(other))),
        }
    }
}

/// Human-readable name of a JSON value's shape, used in error messages.
pub fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
