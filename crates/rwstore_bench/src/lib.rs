//! Shared helpers for RWStore benchmarks.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
