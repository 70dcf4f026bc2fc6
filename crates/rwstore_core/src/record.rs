//! Rewriter records: put requests in, stored sources out, and back.

use crate::error::{CoreError, CoreResult};
use crate::version::{
    VersionMapping, CURRENT_MAPPING_VERSION, PROP_TYPE, PROP_VERSION, REWRITER_TYPE,
};
use crate::RawRecord;
use rwstore_codec::{encode_config_chunked, ConfigObject};
use rwstore_storage::MAX_KEYWORD_BYTES;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated request to save a rewriter.
///
/// Deserializes from the loosely typed put payload: `class` is required,
/// `config` and `info_logging` are optional objects, other keys are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutRewriterRequest {
    /// Implementation class of the rewriter.
    #[serde(rename = "class")]
    pub class_name: String,

    /// Rewriter config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigObject>,

    /// Info logging settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_logging: Option<ConfigObject>,
}

impl PutRewriterRequest {
    /// Creates a request without config or logging settings.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            config: None,
            info_logging: None,
        }
    }

    /// Sets the config.
    #[must_use]
    pub fn with_config(mut self, config: ConfigObject) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the info logging settings.
    #[must_use]
    pub fn with_info_logging(mut self, info_logging: ConfigObject) -> Self {
        self.info_logging = Some(info_logging);
        self
    }

    /// Parses a put payload.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRequest`] if the payload is not an
    /// object, `class` is missing or not a string, or `config` /
    /// `info_logging` are not objects.
    pub fn from_json(payload: &Value) -> CoreResult<Self> {
        if !payload.is_object() {
            return Err(CoreError::invalid_request("payload must be an object"));
        }
        Self::deserialize(payload).map_err(|e| CoreError::invalid_request(e.to_string()))
    }

    /// Builds the record stored for this request, in the current schema.
    ///
    /// The record carries the `rewriter` type, the current version and the
    /// class. Logging settings are copied only if present. The config, if
    /// present, is serialized and split into keyword-sized chunks; an
    /// absent config leaves the config field out entirely.
    ///
    /// # Errors
    ///
    /// Propagates codec errors from encoding the config.
    pub fn to_stored_form(&self) -> CoreResult<RawRecord> {
        let mapping = VersionMapping::CURRENT;
        let mut source = RawRecord::new();
        source.insert(PROP_TYPE.to_string(), Value::from(REWRITER_TYPE));
        source.insert(PROP_VERSION.to_string(), Value::from(CURRENT_MAPPING_VERSION));
        source.insert(
            mapping.class_name_field().to_string(),
            Value::from(self.class_name.as_str()),
        );

        if let Some(info_logging) = &self.info_logging {
            source.insert(
                mapping.info_logging_field().to_string(),
                Value::Object(info_logging.clone()),
            );
        }

        if let Some(config) = &self.config {
            let encoded = encode_config_chunked(config, MAX_KEYWORD_BYTES)?;
            source.insert(mapping.config_field().to_string(), encoded.into_json());
        }

        Ok(source)
    }
}

/// Builds the stored record for a loosely typed put payload.
///
/// # Errors
///
/// See [`PutRewriterRequest::from_json`] and
/// [`PutRewriterRequest::to_stored_form`].
pub fn to_stored_form(payload: &Value) -> CoreResult<RawRecord> {
    PutRewriterRequest::from_json(payload)?.to_stored_form()
}

/// A rewriter as read back from its stored record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewriterDefinition {
    /// Rewriter id (the document id).
    pub id: String,

    /// Schema version the record was written with.
    #[serde(skip)]
    pub mapping: VersionMapping,

    /// Implementation class of the rewriter.
    #[serde(rename = "class")]
    pub class_name: String,

    /// Decoded config; empty if none was stored.
    pub config: ConfigObject,

    /// Whether the record had a config field at all.
    #[serde(skip)]
    pub config_stored: bool,

    /// Info logging settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_logging: Option<ConfigObject>,
}

impl RewriterDefinition {
    /// Turns the definition back into a put request.
    ///
    /// Saving the request rewrites the rewriter in the current schema. The
    /// config is carried over whenever the record stored one, even if it
    /// is empty.
    pub fn to_put_request(&self) -> PutRewriterRequest {
        PutRewriterRequest {
            class_name: self.class_name.clone(),
            config: self.config_stored.then(|| self.config.clone()),
            info_logging: self.info_logging.clone(),
        }
    }
}

/// Reads a rewriter from its stored record, whatever schema it uses.
///
/// # Errors
///
/// Returns version resolution errors, [`CoreError::MalformedRecord`] for
/// fields of the wrong shape, and config decoding errors.
pub fn load_definition(rewriter_id: &str, source: &RawRecord) -> CoreResult<RewriterDefinition> {
    let mapping = VersionMapping::resolve(source)?;
    Ok(RewriterDefinition {
        id: rewriter_id.to_string(),
        mapping,
        class_name: mapping.class_name(rewriter_id, source)?.to_string(),
        config: mapping.config(rewriter_id, source)?,
        config_stored: mapping.has_config(source),
        info_logging: mapping.info_logging(rewriter_id, source)?.cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::decode_config;
    use proptest::prelude::*;
    use serde_json::json;

    fn object(value: Value) -> ConfigObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn stored_form_stamps_type_version_and_class() {
        let source = to_stored_form(&json!({"class": "MyRewriter"})).unwrap();
        assert_eq!(
            Value::Object(source),
            json!({"type": "rewriter", "version": 3, "class": "MyRewriter"})
        );
    }

    #[test]
    fn absent_config_is_omitted() {
        let source = to_stored_form(&json!({"class": "MyRewriter"})).unwrap();
        assert!(!source.contains_key("config_v_003"));
        assert!(!source.contains_key("config"));
        assert!(!source.contains_key("info_logging"));
    }

    #[test]
    fn null_config_is_omitted() {
        let source =
            to_stored_form(&json!({"class": "MyRewriter", "config": null, "info_logging": null}))
                .unwrap();
        assert!(!source.contains_key("config_v_003"));
        assert!(!source.contains_key("info_logging"));
    }

    #[test]
    fn empty_config_is_stored() {
        let source = to_stored_form(&json!({"class": "MyRewriter", "config": {}})).unwrap();
        assert_eq!(source.get("config_v_003"), Some(&json!("{}")));
    }

    #[test]
    fn info_logging_is_copied_verbatim() {
        let logging = json!({"sinks": ["log4j"], "extra": {"k": 1}});
        let source =
            to_stored_form(&json!({"class": "MyRewriter", "info_logging": logging.clone()}))
                .unwrap();
        assert_eq!(source.get("info_logging"), Some(&logging));
    }

    #[test]
    fn large_config_is_chunked() {
        let rules = "a =>\n SYNONYM: b\n".repeat(5_000);
        let source =
            to_stored_form(&json!({"class": "MyRewriter", "config": {"rules": rules}})).unwrap();

        let chunks = source["config_v_003"].as_array().unwrap();
        assert!(chunks.len() > 1);
        for chunk in chunks {
            assert!(chunk.as_str().unwrap().len() <= MAX_KEYWORD_BYTES);
        }

        let config = decode_config(&source, VersionMapping::CURRENT, "r1").unwrap();
        assert_eq!(config.get("rules"), Some(&json!(rules)));
    }

    #[test]
    fn missing_class_is_invalid() {
        let err = to_stored_form(&json!({"config": {}})).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRequest { .. }));
    }

    #[test]
    fn wrong_shapes_are_invalid() {
        for payload in [
            json!({"class": 7}),
            json!({"class": "a", "config": "text"}),
            json!({"class": "a", "info_logging": [1]}),
            json!("not an object"),
        ] {
            let err = to_stored_form(&payload).unwrap_err();
            assert!(matches!(err, CoreError::InvalidRequest { .. }), "{payload}");
        }
    }

    #[test]
    fn extra_keys_are_ignored() {
        let source = to_stored_form(&json!({"class": "a", "description": "x"})).unwrap();
        assert!(!source.contains_key("description"));
    }

    #[test]
    fn builder_matches_payload() {
        let request = PutRewriterRequest::new("MyRewriter")
            .with_config(object(json!({"a": 1})))
            .with_info_logging(object(json!({"sinks": "log4j"})));
        let parsed = PutRewriterRequest::from_json(&json!({
            "class": "MyRewriter",
            "config": {"a": 1},
            "info_logging": {"sinks": "log4j"}
        }))
        .unwrap();
        assert_eq!(request, parsed);
    }

    #[test]
    fn load_current_definition() {
        let request = PutRewriterRequest::new("MyRewriter")
            .with_config(object(json!({"rules": "x => y"})))
            .with_info_logging(object(json!({"sinks": ["log4j"]})));
        let source = request.to_stored_form().unwrap();

        let definition = load_definition("r1", &source).unwrap();
        assert_eq!(definition.id, "r1");
        assert_eq!(definition.mapping, VersionMapping::V3);
        assert_eq!(definition.class_name, "MyRewriter");
        assert_eq!(definition.config, object(json!({"rules": "x => y"})));
        assert_eq!(definition.info_logging, Some(object(json!({"sinks": ["log4j"]}))));
        assert_eq!(definition.to_put_request(), request);
    }

    #[test]
    fn load_legacy_definition() {
        let source = object(json!({
            "type": "rewriter",
            "class": "LegacyRewriter",
            "config": " {\"rules\":\"a => b\"} "
        }));

        let definition = load_definition("old", &source).unwrap();
        assert_eq!(definition.mapping, VersionMapping::Pre3);
        assert_eq!(definition.class_name, "LegacyRewriter");
        assert_eq!(definition.config.get("rules"), Some(&json!("a => b")));
        assert_eq!(definition.info_logging, None);
    }

    #[test]
    fn legacy_definition_upgrades_to_current_form() {
        let source = object(json!({"class": "LegacyRewriter", "config": "{\"k\":[1,2]}"}));
        let upgraded = load_definition("old", &source)
            .unwrap()
            .to_put_request()
            .to_stored_form()
            .unwrap();
        assert_eq!(upgraded.get("version"), Some(&json!(3)));
        assert_eq!(upgraded.get("config_v_003"), Some(&json!("{\"k\":[1,2]}")));
        assert!(!upgraded.contains_key("config"));
    }

    #[test]
    fn empty_stored_config_survives_resave() {
        let source = object(json!({
            "type": "rewriter",
            "version": 3,
            "class": "C",
            "config_v_003": "{}"
        }));
        let definition = load_definition("r1", &source).unwrap();
        assert!(definition.config.is_empty());
        assert!(definition.config_stored);

        let resaved = definition.to_put_request().to_stored_form().unwrap();
        assert_eq!(resaved, source);
    }

    #[test]
    fn absent_config_stays_absent_on_resave() {
        let source = object(json!({"type": "rewriter", "version": 3, "class": "C"}));
        let definition = load_definition("r1", &source).unwrap();
        assert!(!definition.config_stored);
        assert_eq!(definition.to_put_request().config, None);
    }

    #[test]
    fn load_rejects_unknown_version() {
        let source = object(json!({"version": 7, "class": "X"}));
        let err = load_definition("r1", &source).unwrap_err();
        assert_eq!(err, CoreError::UnsupportedSchemaVersion { version: 7 });
    }

    fn long_text() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                3 => Just('a'),
                1 => Just('"'),
                1 => Just('€'),
                1 => Just('😀'),
            ],
            0..20_000,
        )
        .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn stored_config_roundtrips(
            text in long_text(),
            count in 0i64..1_000,
            flag in any::<bool>(),
        ) {
            let config = object(json!({
                "rules": text,
                "nested": {"count": count, "flag": flag, "list": [text.len()]}
            }));
            let source = PutRewriterRequest::new("R")
                .with_config(config.clone())
                .to_stored_form()
                .unwrap();

            let stored = &source["config_v_003"];
            let elements: Vec<&str> = match stored {
                Value::String(s) => vec![s.as_str()],
                Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                other => panic!("unexpected stored shape {other}"),
            };
            for element in elements {
                prop_assert!(element.len() <= MAX_KEYWORD_BYTES);
            }

            let decoded = decode_config(&source, VersionMapping::CURRENT, "r").unwrap();
            prop_assert_eq!(decoded, config);
        }
    }

    #[test]
    fn definition_serializes_like_a_put_payload() {
        let source = object(json!({"class": "X", "config": "{\"a\":1}"}));
        let definition = load_definition("r1", &source).unwrap();
        assert_eq!(
            serde_json::to_value(&definition).unwrap(),
            json!({"id": "r1", "class": "X", "config": {"a": 1}})
        );
    }
}
