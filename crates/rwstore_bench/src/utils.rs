//! Benchmark utilities.

use rand::Rng;
use rwstore_core::{ConfigObject, PutRewriterRequest};
use serde_json::Value;

const ALPHABET: &[char] = &['a', 'b', 'c', ' ', '=', '>', '\n', 'ä', 'ß', '€', '大', '😀'];

/// Generate random text of at least `min_bytes` bytes mixing 1- to
/// 4-byte characters.
pub fn random_text(min_bytes: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut text = String::with_capacity(min_bytes + 4);
    while text.len() < min_bytes {
        text.push(ALPHABET[rng.gen_range(0..ALPHABET.len())]);
    }
    text
}

/// Generate a config holding a rule text of at least `rules_bytes` bytes.
pub fn config_with_rules(rules_bytes: usize) -> ConfigObject {
    let mut config = ConfigObject::new();
    config.insert("rules".to_string(), Value::from(random_text(rules_bytes)));
    config.insert("ignoreCase".to_string(), Value::Bool(true));
    config
}

/// Generate a put request whose config holds `rules_bytes` of rules.
pub fn put_request(rules_bytes: usize) -> PutRewriterRequest {
    PutRewriterRequest::new("CommonRules").with_config(config_with_rules(rules_bytes))
}
