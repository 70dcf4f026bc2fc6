//! # RWStore Core
//!
//! Versioned storage of rewriter configs in a search index.
//!
//! This crate provides:
//! - Schema version resolution for stored rewriter records
//! - Conversion of put requests into current-schema records
//! - Decoding of records of every supported schema back into definitions
//! - Index mapping upgrades between schema eras
//! - A [`RewriterStore`] that ties these together over an index backend
//!
//! ## Example
//!
//! ```rust
//! use rwstore_core::{resolve, to_stored_form, VersionMapping};
//! use serde_json::json;
//!
//! let source = to_stored_form(&json!({"class": "CommonRules", "config": {"rules": "a => b"}})).unwrap();
//! let mapping = resolve(&source).unwrap();
//! assert_eq!(mapping, VersionMapping::CURRENT);
//!
//! let config = mapping.config("my_rules", &source).unwrap();
//! assert_eq!(config["rules"], json!("a => b"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
pub mod migration;
mod record;
mod store;
mod version;

pub use config::{StoreConfig, DEFAULT_INDEX_NAME};
pub use error::{CoreError, CoreResult};
pub use migration::{index_mapping, MappingCheck, MappingUpgrade};
pub use record::{load_definition, to_stored_form, PutRewriterRequest, RewriterDefinition};
pub use store::{PutOutcome, RewriterStore};
pub use version::{
    decode_config, resolve, FieldNames, VersionMapping, CURRENT_MAPPING_VERSION, PROP_TYPE,
    PROP_VERSION, REWRITER_TYPE,
};

pub use rwstore_codec::ConfigObject;
pub use rwstore_storage::MAX_KEYWORD_BYTES;

/// A stored rewriter record as read from or written to the index.
pub type RawRecord = rwstore_storage::Document;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
