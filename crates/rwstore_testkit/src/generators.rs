//! Property-based test generators using proptest.
//!
//! Provides strategies for generating configs, texts and put payloads
//! that exercise chunking across multi-byte characters.

use proptest::prelude::*;
use rwstore_core::{ConfigObject, PutRewriterRequest};
use serde_json::Value;

/// Strategy for text mixing 1-, 2-, 3- and 4-byte UTF-8 characters.
pub fn mixed_width_text_strategy(max_chars: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            6 => prop::char::range('a', 'z'),
            1 => Just(' '),
            1 => Just('ß'),
            1 => Just('€'),
            1 => Just('😀'),
        ],
        0..max_chars,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for rewriter ids.
pub fn rewriter_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,31}").expect("Invalid regex")
}

/// Strategy for leaf JSON values.
///
/// Floats are left out: they do not always survive a text round trip
/// bit for bit.
pub fn json_leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        mixed_width_text_strategy(32).prop_map(Value::from),
    ]
}

/// Strategy for nested JSON values up to a few levels deep.
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    json_leaf_strategy().prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy for config objects.
pub fn config_strategy() -> impl Strategy<Value = ConfigObject> {
    prop::collection::btree_map("[a-zA-Z_]{1,12}", json_value_strategy(), 0..8)
        .prop_map(|map| map.into_iter().collect())
}

/// Strategy for configs whose encoding is larger than a keyword field.
pub fn oversized_config_strategy() -> impl Strategy<Value = ConfigObject> {
    (config_strategy(), 33_000usize..70_000).prop_map(|(mut config, len)| {
        config.insert("rules".to_string(), Value::from("x".repeat(len)));
        config
    })
}

/// Strategy for put requests with optional config and logging settings.
pub fn put_request_strategy() -> impl Strategy<Value = PutRewriterRequest> {
    (
        "[A-Z][a-zA-Z]{0,15}",
        prop::option::of(config_strategy()),
        prop::option::of(prop_oneof![
            Just(serde_json::json!({"sinks": "log4j"})),
            Just(serde_json::json!({"sinks": ["log4j", "other"]})),
        ]),
    )
        .prop_map(|(class_name, config, info_logging)| PutRewriterRequest {
            class_name,
            config,
            info_logging: info_logging.and_then(|v| v.as_object().cloned()),
        })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
