//! # RWStore Testkit
//!
//! Test utilities for RWStore.
//!
//! This crate provides:
//! - Stored record fixtures for every schema era and store helpers
//! - Property-based test generators using proptest
//! - Cross-crate integration test helpers
//! - Fuzz testing harnesses
//!
//! ## Usage
//!
//! ```rust
//! use rwstore_testkit::prelude::*;
//! use serde_json::json;
//!
//! with_store(|store| {
//!     store.put_rewriter("common", &json!({"class": "CommonRules"})).unwrap();
//!     assert!(store.get_rewriter("common").unwrap().is_some());
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod fuzz;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
pub use integration::*;
