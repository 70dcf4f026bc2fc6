//! # RWStore Storage
//!
//! Index backend trait and implementations for RWStore.
//!
//! This crate models the search index the rewriter store writes into.
//! Backends are **opaque document stores** - they do not interpret
//! rewriter records.
//!
//! ## Design Principles
//!
//! - Backends expose index administration (create, mapping get/put) and
//!   document writes/reads
//! - Keyword fields reject values longer than [`MAX_KEYWORD_BYTES`]
//! - Must be `Send + Sync` for concurrent access
//! - The rewriter store owns all record format interpretation
//!
//! ## Available Backends
//!
//! - [`InMemoryIndex`] - For testing and offline tooling
//!
//! ## Example
//!
//! ```rust
//! use rwstore_storage::{IndexBackend, InMemoryIndex, StorageError};
//!
//! let index = InMemoryIndex::new();
//! let err = index.get_mapping("rewriters").unwrap_err();
//! assert!(matches!(err, StorageError::IndexNotFound { .. }));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod memory;

pub use backend::IndexBackend;
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryIndex;

/// Largest UTF-8 byte length a keyword field value may have.
///
/// This is the term length ceiling of the index's keyword field type.
pub const MAX_KEYWORD_BYTES: usize = 32766;

/// A stored document source: a string-keyed, arbitrarily nested mapping.
pub type Document = serde_json::Map<String, serde_json::Value>;
