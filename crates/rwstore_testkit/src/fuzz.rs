//! Fuzz testing harnesses for RWStore.
//!
//! This module provides fuzz targets that can be used with cargo-fuzz
//! or other fuzzing frameworks.

use rwstore_codec::{join, join_value, parse_config, split, MIN_CHUNK_BYTES};
use rwstore_core::{load_definition, to_stored_form, RewriterStore};
use rwstore_storage::InMemoryIndex;
use serde_json::Value;

/// Fuzz target for splitting text.
///
/// The first byte picks the chunk limit, the rest is read as text. Every
/// chunk must fit the limit and the chunks must join back to the text.
pub fn fuzz_split(data: &[u8]) {
    let Some((&limit, rest)) = data.split_first() else {
        return;
    };
    let max = limit as usize;
    let text = String::from_utf8_lossy(rest);

    match split(&text, max) {
        Ok(encoded) => {
            for chunk in encoded.iter() {
                assert!(chunk.len() <= max, "Chunk exceeds limit");
            }
            assert_eq!(join(&encoded), text.trim(), "Join mismatch");
        }
        Err(_) => assert!(
            max < MIN_CHUNK_BYTES || text.chars().any(|c| c.len_utf8() > max),
            "Split failed for a valid limit"
        ),
    }
}

/// Fuzz target for decoding stored config values.
///
/// Tests that arbitrary JSON either decodes to a config or returns a
/// proper error (no panics).
pub fn fuzz_join_value(data: &[u8]) {
    if let Ok(value) = serde_json::from_slice::<Value>(data) {
        if let Ok(text) = join_value(&value) {
            let _ = parse_config(&text);
        }
    }
}

/// Fuzz target for loading stored records.
///
/// Tests that arbitrary records either load or fail with an error.
pub fn fuzz_load_definition(data: &[u8]) {
    if let Ok(Value::Object(source)) = serde_json::from_slice::<Value>(data) {
        let _ = load_definition("fuzz", &source);
    }
}

/// Fuzz target for the write helper.
///
/// Anything the write helper accepts must load back with the same class.
pub fn fuzz_stored_form(data: &[u8]) {
    let Ok(payload) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    if let Ok(source) = to_stored_form(&payload) {
        let loaded = load_definition("fuzz", &source).expect("Stored form must load");
        assert_eq!(Some(loaded.class_name.as_str()), payload["class"].as_str());
    }
}

/// Structured fuzzing input for store operations.
#[derive(Debug, Clone)]
pub enum FuzzOp {
    /// Save a rewriter.
    Put {
        /// Rewriter id selector.
        id: u8,
        /// Raw put payload bytes.
        payload: Vec<u8>,
    },
    /// Load a rewriter.
    Get {
        /// Rewriter id selector.
        id: u8,
    },
    /// Delete a rewriter.
    Delete {
        /// Rewriter id selector.
        id: u8,
    },
}

impl FuzzOp {
    /// Parse operations from fuzzer input.
    pub fn parse_sequence(data: &[u8]) -> Vec<FuzzOp> {
        let mut ops = Vec::new();
        let mut offset = 0;

        while offset + 2 <= data.len() {
            let op_type = data[offset];
            let id = data[offset + 1];
            offset += 2;

            let op = match op_type % 3 {
                0 => {
                    let len = data.get(offset).copied().unwrap_or(0) as usize;
                    offset += 1;
                    if offset + len > data.len() {
                        break;
                    }
                    let payload = data[offset..offset + len].to_vec();
                    offset += len;
                    FuzzOp::Put { id, payload }
                }
                1 => FuzzOp::Get { id },
                _ => FuzzOp::Delete { id },
            };

            ops.push(op);
        }

        ops
    }

    /// Execute operations on a store.
    pub fn execute_sequence(ops: &[FuzzOp], store: &RewriterStore<InMemoryIndex>) {
        for op in ops {
            match op {
                FuzzOp::Put { id, payload } => {
                    if let Ok(payload) = serde_json::from_slice::<Value>(payload) {
                        let _ = store.put_rewriter(&format!("r{id}"), &payload);
                    }
                }
                FuzzOp::Get { id } => {
                    let _ = store.get_rewriter(&format!("r{id}"));
                }
                FuzzOp::Delete { id } => {
                    let _ = store.delete_rewriter(&format!("r{id}"));
                }
            }
        }
    }
}

/// Fuzz target for store operation sequences.
///
/// Tests that arbitrary operation sequences don't cause panics.
pub fn fuzz_store_operations(data: &[u8]) {
    let store = RewriterStore::new(InMemoryIndex::new());
    FuzzOp::execute_sequence(&FuzzOp::parse_sequence(data), &store);
}
