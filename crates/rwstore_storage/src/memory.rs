//! In-memory index backend for testing.

use crate::backend::IndexBackend;
use crate::error::{StorageError, StorageResult};
use crate::{Document, MAX_KEYWORD_BYTES};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct IndexState {
    mapping: Map<String, Value>,
    documents: HashMap<String, Document>,
}

/// An in-memory index backend.
///
/// Keeps mappings and documents in memory and enforces the keyword field
/// byte limit the way a real index would, which makes it suitable for:
/// - Unit tests
/// - Integration tests
/// - Offline tooling that needs a scratch index
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use rwstore_storage::{IndexBackend, InMemoryIndex};
/// use serde_json::json;
///
/// let index = InMemoryIndex::new();
/// index
///     .create_index("rewriters", &json!({"properties": {"class": {"type": "keyword"}}}))
///     .unwrap();
///
/// let mut doc = serde_json::Map::new();
/// doc.insert("class".into(), json!("CommonRules"));
/// index.index_document("rewriters", "r1", doc.clone()).unwrap();
/// assert_eq!(index.get_document("rewriters", "r1").unwrap(), Some(doc));
/// ```
#[derive(Debug)]
pub struct InMemoryIndex {
    indices: RwLock<HashMap<String, IndexState>>,
    acknowledge_mappings: AtomicBool,
    mapping_updates: AtomicUsize,
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self {
            indices: RwLock::new(HashMap::new()),
            acknowledge_mappings: AtomicBool::new(true),
            mapping_updates: AtomicUsize::new(0),
        }
    }
}

impl InMemoryIndex {
    /// Creates a new backend without any index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls whether `put_mapping` reports its updates as acknowledged.
    ///
    /// Unacknowledged updates are still applied. Useful for testing how
    /// callers react to a cluster that did not confirm a mapping change.
    pub fn set_acknowledge_mappings(&self, acknowledge: bool) {
        self.acknowledge_mappings.store(acknowledge, Ordering::SeqCst);
    }

    /// Number of `put_mapping` calls received so far.
    #[must_use]
    pub fn mapping_updates(&self) -> usize {
        self.mapping_updates.load(Ordering::SeqCst)
    }

    /// Number of documents in `index`, or `None` if it does not exist.
    #[must_use]
    pub fn document_count(&self, index: &str) -> Option<usize> {
        self.indices.read().get(index).map(|s| s.documents.len())
    }

    /// Returns true if `index` exists.
    #[must_use]
    pub fn has_index(&self, index: &str) -> bool {
        self.indices.read().contains_key(index)
    }

    /// Removes every index.
    pub fn clear(&self) {
        self.indices.write().clear();
    }
}

impl IndexBackend for InMemoryIndex {
    fn get_mapping(&self, index: &str) -> StorageResult<Value> {
        let indices = self.indices.read();
        let state = indices.get(index).ok_or_else(|| not_found(index))?;
        Ok(Value::Object(state.mapping.clone()))
    }

    fn create_index(&self, index: &str, mapping: &Value) -> StorageResult<()> {
        let properties = properties_of(mapping)?;
        let mut indices = self.indices.write();
        if indices.contains_key(index) {
            return Err(StorageError::IndexAlreadyExists {
                index: index.to_string(),
            });
        }

        let mut state = IndexState::default();
        state
            .mapping
            .insert("properties".to_string(), Value::Object(properties.clone()));
        indices.insert(index.to_string(), state);
        Ok(())
    }

    fn put_mapping(&self, index: &str, patch: &Value) -> StorageResult<bool> {
        let patch_properties = properties_of(patch)?;
        let mut indices = self.indices.write();
        let state = indices.get_mut(index).ok_or_else(|| not_found(index))?;

        let properties = state
            .mapping
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(properties) = properties else {
            return Err(StorageError::InvalidMapping(
                "stored properties is not an object".to_string(),
            ));
        };
        for (name, definition) in patch_properties {
            properties.insert(name.clone(), definition.clone());
        }

        self.mapping_updates.fetch_add(1, Ordering::SeqCst);
        Ok(self.acknowledge_mappings.load(Ordering::SeqCst))
    }

    fn index_document(&self, index: &str, id: &str, source: Document) -> StorageResult<()> {
        let mut indices = self.indices.write();
        let state = indices.get_mut(index).ok_or_else(|| not_found(index))?;

        if let Some(Value::Object(properties)) = state.mapping.get("properties") {
            check_keyword_limits(properties, &source, "")?;
        }
        state.documents.insert(id.to_string(), source);
        Ok(())
    }

    fn get_document(&self, index: &str, id: &str) -> StorageResult<Option<Document>> {
        let indices = self.indices.read();
        let state = indices.get(index).ok_or_else(|| not_found(index))?;
        Ok(state.documents.get(id).cloned())
    }

    fn delete_document(&self, index: &str, id: &str) -> StorageResult<bool> {
        let mut indices = self.indices.write();
        let state = indices.get_mut(index).ok_or_else(|| not_found(index))?;
        Ok(state.documents.remove(id).is_some())
    }
}

fn not_found(index: &str) -> StorageError {
    StorageError::IndexNotFound {
        index: index.to_string(),
    }
}

fn properties_of(mapping: &Value) -> StorageResult<&Map<String, Value>> {
    match mapping.get("properties") {
        Some(Value::Object(properties)) => Ok(properties),
        Some(_) => Err(StorageError::InvalidMapping(
            "properties must be an object".to_string(),
        )),
        None => Err(StorageError::InvalidMapping(
            "mapping has no properties".to_string(),
        )),
    }
}

fn check_keyword_limits(
    properties: &Map<String, Value>,
    source: &Map<String, Value>,
    prefix: &str,
) -> StorageResult<()> {
    for (name, definition) in properties {
        let Some(value) = source.get(name) else {
            continue;
        };
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };

        if definition.get("type").and_then(Value::as_str) == Some("keyword") {
            let strings: Vec<&str> = match value {
                Value::String(s) => vec![s.as_str()],
                Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                _ => Vec::new(),
            };
            for s in strings {
                if s.len() > MAX_KEYWORD_BYTES {
                    return Err(StorageError::FieldTooLarge {
                        field: path,
                        bytes: s.len(),
                        max: MAX_KEYWORD_BYTES,
                    });
                }
            }
        }

        if let (Some(Value::Object(nested)), Value::Object(inner)) =
            (definition.get("properties"), value)
        {
            check_keyword_limits(nested, inner, &path)?;
        }
    }
    Ok(())
}
