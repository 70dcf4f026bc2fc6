//! Chunking encoder.

use crate::error::{CodecError, CodecResult};
use crate::value::EncodedValue;
use crate::ConfigObject;

/// Smallest chunk limit `split` accepts once a string needs splitting.
///
/// A limit below three bytes cannot hold every character of the Basic
/// Multilingual Plane, so chunking could stall.
pub const MIN_CHUNK_BYTES: usize = 3;

/// Split a string so that every element fits into `max_utf8_bytes`.
///
/// If the UTF-8 encoding of `s` already fits, it is returned unchanged as
/// [`EncodedValue::Single`]. Otherwise the string is cut into the longest
/// possible prefixes that fit the limit and end on a character boundary.
/// Concatenating the chunks in order yields `s` again.
///
/// # Errors
///
/// Returns [`CodecError::InvalidParameter`] if the string needs splitting
/// and `max_utf8_bytes` is smaller than [`MIN_CHUNK_BYTES`], or if a single
/// character is wider than the limit.
pub fn split(s: &str, max_utf8_bytes: usize) -> CodecResult<EncodedValue> {
    if s.len() <= max_utf8_bytes {
        return Ok(EncodedValue::Single(s.to_string()));
    }
    if max_utf8_bytes < MIN_CHUNK_BYTES {
        return Err(CodecError::invalid_parameter(format!(
            "max_utf8_bytes >= {} expected, got {}",
            MIN_CHUNK_BYTES, max_utf8_bytes
        )));
    }

    let mut chunks = Vec::with_capacity(s.len() / max_utf8_bytes + 1);
    let mut rest = s;
    while rest.len() > max_utf8_bytes {
        let end = floor_char_boundary(rest, max_utf8_bytes);
        if end == 0 {
            let width = rest.chars().next().map_or(0, char::len_utf8);
            return Err(CodecError::invalid_parameter(format!(
                "character of {} bytes does not fit max_utf8_bytes {}",
                width, max_utf8_bytes
            )));
        }
        let (head, tail) = rest.split_at(end);
        chunks.push(head.to_string());
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }

    Ok(EncodedValue::Chunks(chunks))
}

/// Serialize a config object to compact JSON text.
///
/// Keys come out in sorted order, so one object always produces the same
/// text.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if serialization fails.
pub fn encode_config(config: &ConfigObject) -> CodecResult<String> {
    serde_json::to_string(config).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

/// Serialize a config object and split the text for a keyword field.
///
/// # Errors
///
/// Propagates errors from [`encode_config`] and [`split`].
pub fn encode_config_chunked(
    config: &ConfigObject,
    max_utf8_bytes: usize,
) -> CodecResult<EncodedValue> {
    let text = encode_config(config)?;
    split(&text, max_utf8_bytes)
}

// Largest char boundary of `s` that is <= `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut end = index;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}
