//! Test fixtures and store helpers.
//!
//! Provides ready-made stored records of each schema era and a store over
//! an in-memory index.

use rwstore_core::{
    index_mapping, ConfigObject, RawRecord, RewriterStore, StoreConfig, DEFAULT_INDEX_NAME,
};
use rwstore_storage::{IndexBackend, InMemoryIndex};
use serde_json::{json, Value};

/// A rewriter store over an in-memory index.
pub struct TestStore {
    /// The store instance.
    pub store: RewriterStore<InMemoryIndex>,
}

impl TestStore {
    /// Creates a store with an empty in-memory index.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            store: RewriterStore::with_config(InMemoryIndex::new(), config),
        }
    }

    /// Creates a store whose index already exists with `mapping`.
    pub fn with_mapping(mapping: &Value) -> Self {
        let test_store = Self::new();
        test_store
            .index()
            .create_index(DEFAULT_INDEX_NAME, mapping)
            .expect("Failed to create index");
        test_store
    }

    /// Returns the backing index.
    pub fn index(&self) -> &InMemoryIndex {
        self.store.backend()
    }

    /// Writes a raw record directly, bypassing the store.
    pub fn seed(&self, id: &str, source: RawRecord) {
        let index_name = &self.store.config().index_name;
        if !self.index().has_index(index_name) {
            self.index()
                .create_index(index_name, &index_mapping())
                .expect("Failed to create index");
        }
        self.index()
            .index_document(index_name, id, source)
            .expect("Failed to seed record");
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestStore {
    type Target = RewriterStore<InMemoryIndex>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test closure with a fresh store.
pub fn with_store<F, R>(f: F) -> R
where
    F: FnOnce(&RewriterStore<InMemoryIndex>) -> R,
{
    let test_store = TestStore::new();
    f(&test_store.store)
}

/// Converts a JSON object literal into a map.
///
/// # Panics
///
/// Panics if `value` is not an object.
pub fn object(value: Value) -> ConfigObject {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got {other}"),
    }
}

/// A record as written before schema version 3: no version, config as a
/// JSON-encoded string in `config`.
pub fn legacy_record(class_name: &str, config: &Value) -> RawRecord {
    object(json!({
        "type": "rewriter",
        "class": class_name,
        "config": config.to_string(),
    }))
}

/// A current record with the config encoded as a single string.
pub fn current_record(class_name: &str, config: &Value) -> RawRecord {
    object(json!({
        "type": "rewriter",
        "version": 3,
        "class": class_name,
        "config_v_003": config.to_string(),
    }))
}

/// A current record with the encoded config split into `chunks`.
pub fn chunked_record(class_name: &str, chunks: &[&str]) -> RawRecord {
    object(json!({
        "type": "rewriter",
        "version": 3,
        "class": class_name,
        "config_v_003": chunks,
    }))
}

/// Mapping of an index created before `info_logging` existed.
pub fn v1_mapping() -> Value {
    json!({"properties": {
        "type": {"type": "keyword"},
        "class": {"type": "keyword"},
        "config": {"type": "keyword", "doc_values": false, "index": false}
    }})
}

/// Mapping of an index created before `config_v_003` existed.
pub fn v2_mapping() -> Value {
    json!({"properties": {
        "type": {"type": "keyword"},
        "class": {"type": "keyword"},
        "config": {"type": "keyword", "doc_values": false, "index": false},
        "info_logging": {"properties": {"sinks": {"type": "keyword"}}}
    }})
}

/// A sample rule text of at least `min_bytes` bytes, mixing character
/// widths.
pub fn rule_text(min_bytes: usize) -> String {
    let line = "äpfel => apple\nrüben => 大根\n😀 => smile\n";
    line.repeat(min_bytes / line.len() + 1)
}
