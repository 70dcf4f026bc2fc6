//! Cross-crate integration test helpers.
//!
//! Provides utilities for testing the codec, the version resolver and the
//! store together.

use rwstore_codec::{join, split, EncodedValue};
use rwstore_core::{
    load_definition, to_stored_form, PutRewriterRequest, RewriterDefinition, RewriterStore,
    VersionMapping, MAX_KEYWORD_BYTES,
};
use rwstore_storage::InMemoryIndex;
use std::collections::HashMap;

/// A test harness for integration testing.
pub struct IntegrationHarness {
    /// The store instance.
    pub store: RewriterStore<InMemoryIndex>,
    /// Rewriter tracking for verification.
    rewriters: HashMap<String, PutRewriterRequest>,
}

impl IntegrationHarness {
    /// Creates a new integration harness over an empty in-memory index.
    pub fn new() -> Self {
        Self {
            store: RewriterStore::new(InMemoryIndex::new()),
            rewriters: HashMap::new(),
        }
    }

    /// Saves a rewriter and tracks it for later verification.
    pub fn put(&mut self, id: &str, request: PutRewriterRequest) {
        self.store
            .put_request(id, &request)
            .expect("Failed to put rewriter");
        self.rewriters.insert(id.to_string(), request);
    }

    /// Loads a rewriter and verifies it matches the tracked request.
    pub fn get_and_verify(&self, id: &str) -> Option<RewriterDefinition> {
        let actual = self.store.get_rewriter(id).expect("Failed to get rewriter");

        if let Some(expected) = self.rewriters.get(id) {
            let actual = actual.as_ref().expect("Tracked rewriter is missing");
            assert_matches_request(actual, expected);
        }

        actual
    }

    /// Deletes a rewriter and updates tracking.
    pub fn delete(&mut self, id: &str) {
        self.store
            .delete_rewriter(id)
            .expect("Failed to delete rewriter");
        self.rewriters.remove(id);
    }

    /// Verifies all tracked rewriters are in the store.
    pub fn verify_all(&self) {
        for id in self.rewriters.keys() {
            self.get_and_verify(id);
        }
    }

    /// Returns the count of tracked rewriters.
    pub fn tracked_count(&self) -> usize {
        self.rewriters.len()
    }
}

impl Default for IntegrationHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Asserts that a loaded definition carries what the request saved.
///
/// A request without config loads as an empty config.
pub fn assert_matches_request(actual: &RewriterDefinition, expected: &PutRewriterRequest) {
    assert_eq!(actual.class_name, expected.class_name, "Class mismatch for {}", actual.id);
    assert_eq!(
        actual.config,
        expected.config.clone().unwrap_or_default(),
        "Config mismatch for {}",
        actual.id
    );
    assert_eq!(
        actual.info_logging, expected.info_logging,
        "Info logging mismatch for {}",
        actual.id
    );
}

/// Codec and record integration.
pub mod codec_record {
    use super::*;

    /// Verifies that a text survives splitting at `max` and joining.
    pub fn test_split_join(text: &str, max: usize) {
        let encoded = split(text, max).expect("Failed to split");
        for chunk in encoded.iter() {
            assert!(chunk.len() <= max, "Chunk of {} bytes exceeds {}", chunk.len(), max);
        }
        assert_eq!(join(&encoded), text.trim(), "Join should restore the text");
    }

    /// Verifies that a request is stored in the current schema and reads
    /// back unchanged.
    pub fn test_stored_form_roundtrip(request: &PutRewriterRequest) {
        let payload = serde_json::to_value(request).expect("Failed to serialize request");
        let source = to_stored_form(&payload).expect("Failed to build stored form");

        let mapping = VersionMapping::resolve(&source).expect("Failed to resolve");
        assert_eq!(mapping, VersionMapping::CURRENT);

        if let Some(config) = source.get(mapping.config_field()) {
            let encoded = EncodedValue::try_from(config).expect("Unexpected config shape");
            assert!(encoded.max_element_bytes() <= MAX_KEYWORD_BYTES);
        }

        let loaded = load_definition("roundtrip", &source).expect("Failed to load");
        assert_matches_request(&loaded, request);
    }
}

/// Store integration.
pub mod store {
    use super::*;
    use crate::fixtures::{legacy_record, object, rule_text, TestStore};
    use serde_json::json;

    /// Tests that a legacy record is rewritten in the current schema by
    /// loading and saving it again.
    pub fn test_legacy_rewrite(test_store: &TestStore) {
        let config = json!({"rules": "alt => neu"});
        test_store.seed("legacy", legacy_record("CommonRules", &config));

        let loaded = test_store
            .get_rewriter("legacy")
            .expect("Failed to get")
            .expect("Legacy rewriter should exist");
        assert_eq!(loaded.mapping, VersionMapping::Pre3);

        test_store
            .put_request("legacy", &loaded.to_put_request())
            .expect("Failed to resave");

        let reloaded = test_store
            .get_rewriter("legacy")
            .expect("Failed to get")
            .expect("Rewriter should still exist");
        assert_eq!(reloaded.mapping, VersionMapping::CURRENT);
        assert_eq!(reloaded.config, loaded.config);
    }

    /// Tests that a config too large for one keyword field is chunked.
    pub fn test_large_config(test_store: &TestStore) {
        let rules = rule_text(3 * MAX_KEYWORD_BYTES);
        let request =
            PutRewriterRequest::new("CommonRules").with_config(object(json!({ "rules": rules })));

        let outcome = test_store
            .put_request("large", &request)
            .expect("Failed to put large config");
        assert!(outcome.config_chunks > 1, "Large config should be chunked");

        let loaded = test_store
            .get_rewriter("large")
            .expect("Failed to get")
            .expect("Large rewriter should exist");
        assert_matches_request(&loaded, &request);
    }
}
