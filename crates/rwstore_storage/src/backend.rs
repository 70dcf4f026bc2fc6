//! Index backend trait definition.

use crate::error::StorageResult;
use crate::Document;
use serde_json::Value;

/// The index-administration and document API the rewriter store runs on.
///
/// Backends store documents as opaque string-keyed maps. They know about
/// mappings only as far as the field types dictate what a document may
/// hold; they never interpret rewriter records.
///
/// # Invariants
///
/// - `get_document` returns exactly the source last written for an id
/// - `put_mapping` only adds or replaces properties, it never drops them
/// - Backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryIndex`] - For testing and tooling
pub trait IndexBackend: Send + Sync {
    /// Returns the mapping of `index` (an object with a `properties` key).
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::IndexNotFound`] if the index does
    /// not exist.
    fn get_mapping(&self, index: &str) -> StorageResult<Value>;

    /// Creates `index` with the given mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the index already exists or the mapping is
    /// malformed.
    fn create_index(&self, index: &str, mapping: &Value) -> StorageResult<()>;

    /// Merges the `properties` of `patch` into the mapping of `index`.
    ///
    /// Returns whether the update was acknowledged.
    ///
    /// # Errors
    ///
    /// Returns an error if the index does not exist or the patch is
    /// malformed.
    fn put_mapping(&self, index: &str, patch: &Value) -> StorageResult<bool>;

    /// Writes `source` under `id`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns an error if the index does not exist or a field value
    /// violates its mapped type.
    fn index_document(&self, index: &str, id: &str, source: Document) -> StorageResult<()>;

    /// Reads the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index does not exist.
    fn get_document(&self, index: &str, id: &str) -> StorageResult<Option<Document>>;

    /// Deletes the document stored under `id`.
    ///
    /// Returns whether a document was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the index does not exist.
    fn delete_document(&self, index: &str, id: &str) -> StorageResult<bool>;
}
