//! Storage schema versions of rewriter records.
//!
//! Every stored record declares (or, for the oldest records, omits) the
//! schema version it was written with. The version decides which fields
//! hold the rewriter class, the encoded config and the info logging
//! settings.
//!
//! ## Versions
//!
//! | Version | Mapping | Config field |
//! |---------|---------|--------------|
//! | absent | [`VersionMapping::Pre3`] | `config` |
//! | 3 | [`VersionMapping::V3`] | `config_v_003` |
//!
//! Records are always written with [`VersionMapping::CURRENT`]. Older
//! mappings stay readable indefinitely. A new schema adds a new variant;
//! existing variants never change.

use crate::error::{CoreError, CoreResult};
use crate::RawRecord;
use rwstore_codec::{decode_config_value, shape_name, CodecError, ConfigObject};
use serde_json::Value;

/// The schema version every new record is written with.
pub const CURRENT_MAPPING_VERSION: i64 = 3;

/// Record attribute holding the schema version.
pub const PROP_VERSION: &str = "version";

/// Record attribute holding the document type discriminator.
pub const PROP_TYPE: &str = "type";

/// Value of [`PROP_TYPE`] for rewriter records.
pub const REWRITER_TYPE: &str = "rewriter";

/// Field names used by one schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldNames {
    /// Field holding the rewriter implementation class.
    pub class_name: &'static str,
    /// Field holding the encoded config.
    pub config: &'static str,
    /// Field holding the info logging settings.
    pub info_logging: &'static str,
}

const PRE3_FIELDS: FieldNames = FieldNames {
    class_name: "class",
    config: "config",
    info_logging: "info_logging",
};

const V3_FIELDS: FieldNames = FieldNames {
    class_name: "class",
    config: "config_v_003",
    info_logging: "info_logging",
};

/// How to read and write a record of one schema version.
///
/// Mappings are plain values without state; all extraction methods are
/// pure functions of the record they are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionMapping {
    /// Records written before versioning was introduced.
    Pre3,
    /// Version 3 records, with the config split into keyword-sized chunks.
    V3,
}

impl VersionMapping {
    /// The mapping new records are written with.
    pub const CURRENT: VersionMapping = VersionMapping::V3;

    /// Resolves the mapping that reads `source`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedSchemaVersion`] for an integer
    /// version other than the current one, and
    /// [`CoreError::InvalidVersionTag`] if the version is not an integer.
    pub fn resolve(source: &RawRecord) -> CoreResult<Self> {
        Self::for_version(read_version(source)?)
    }

    /// Returns the mapping for a declared version.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedSchemaVersion`] for any version
    /// other than absent or [`CURRENT_MAPPING_VERSION`].
    pub fn for_version(version: Option<i64>) -> CoreResult<Self> {
        match version {
            None => Ok(VersionMapping::Pre3),
            Some(CURRENT_MAPPING_VERSION) => Ok(VersionMapping::V3),
            Some(version) => Err(CoreError::UnsupportedSchemaVersion { version }),
        }
    }

    /// The version tag records of this mapping carry.
    pub const fn version(self) -> Option<i64> {
        match self {
            VersionMapping::Pre3 => None,
            VersionMapping::V3 => Some(CURRENT_MAPPING_VERSION),
        }
    }

    /// Returns true for the mapping new records are written with.
    pub const fn is_current(self) -> bool {
        matches!(self, VersionMapping::V3)
    }

    /// The field names of this mapping.
    pub const fn fields(self) -> &'static FieldNames {
        match self {
            VersionMapping::Pre3 => &PRE3_FIELDS,
            VersionMapping::V3 => &V3_FIELDS,
        }
    }

    /// Field holding the rewriter implementation class.
    pub const fn class_name_field(self) -> &'static str {
        self.fields().class_name
    }

    /// Field holding the encoded config.
    pub const fn config_field(self) -> &'static str {
        self.fields().config
    }

    /// Field holding the info logging settings.
    pub const fn info_logging_field(self) -> &'static str {
        self.fields().info_logging
    }

    /// Reads the rewriter class from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedRecord`] if the field is missing or
    /// not a string.
    pub fn class_name<'a>(self, rewriter_id: &str, source: &'a RawRecord) -> CoreResult<&'a str> {
        let field = self.class_name_field();
        match source.get(field) {
            Some(Value::String(class_name)) => Ok(class_name.as_str()),
            Some(other) => Err(CoreError::malformed_record(
                rewriter_id,
                format!("'{}' must be a string, found {}", field, shape_name(other)),
            )),
            None => Err(CoreError::malformed_record(
                rewriter_id,
                format!("'{}' is missing", field),
            )),
        }
    }

    /// Reads the info logging settings from `source`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedRecord`] if the field is present but
    /// not an object.
    pub fn info_logging<'a>(
        self,
        rewriter_id: &str,
        source: &'a RawRecord,
    ) -> CoreResult<Option<&'a ConfigObject>> {
        let field = self.info_logging_field();
        match source.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(settings)) => Ok(Some(settings)),
            Some(other) => Err(CoreError::malformed_record(
                rewriter_id,
                format!("'{}' must be an object, found {}", field, shape_name(other)),
            )),
        }
    }

    /// Returns true if `source` has a non-null config field.
    pub fn has_config(self, source: &RawRecord) -> bool {
        !matches!(source.get(self.config_field()), None | Some(Value::Null))
    }

    /// Reads and decodes the config from `source`.
    ///
    /// See [`decode_config`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`decode_config`].
    pub fn config(self, rewriter_id: &str, source: &RawRecord) -> CoreResult<ConfigObject> {
        decode_config(source, self, rewriter_id)
    }
}

/// Resolves the mapping that reads `source`.
///
/// Shorthand for [`VersionMapping::resolve`].
///
/// # Errors
///
/// See [`VersionMapping::resolve`].
pub fn resolve(source: &RawRecord) -> CoreResult<VersionMapping> {
    VersionMapping::resolve(source)
}

/// Reads the config field named by `mapping`, joins its chunks and parses
/// the text.
///
/// An absent, null or blank field yields an empty config.
///
/// # Errors
///
/// Returns [`CoreError::Codec`] if the field is neither a string nor an
/// array of strings, and [`CoreError::MalformedConfig`] naming
/// `rewriter_id` if the joined text is not a JSON object.
pub fn decode_config(
    source: &RawRecord,
    mapping: VersionMapping,
    rewriter_id: &str,
) -> CoreResult<ConfigObject> {
    decode_config_value(source.get(mapping.config_field())).map_err(|e| match e {
        CodecError::DecodingFailed { message } => CoreError::malformed_config(rewriter_id, message),
        other => other.into(),
    })
}

fn read_version(source: &RawRecord) -> CoreResult<Option<i64>> {
    match source.get(PROP_VERSION) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| CoreError::invalid_version_tag(format!("number {}", n))),
        Some(other) => Err(CoreError::invalid_version_tag(shape_name(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn missing_version_is_pre3() {
        assert_eq!(resolve(&RawRecord::new()).unwrap(), VersionMapping::Pre3);
        assert_eq!(
            resolve(&record(json!({"class": "a"}))).unwrap(),
            VersionMapping::Pre3
        );
    }

    #[test]
    fn null_version_is_pre3() {
        assert_eq!(
            resolve(&record(json!({"version": null}))).unwrap(),
            VersionMapping::Pre3
        );
    }

    #[test]
    fn current_version_is_v3() {
        let mapping = resolve(&record(json!({"version": 3}))).unwrap();
        assert_eq!(mapping, VersionMapping::V3);
        assert_eq!(mapping, VersionMapping::CURRENT);
        assert!(mapping.is_current());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = resolve(&record(json!({"version": 99}))).unwrap_err();
        assert_eq!(err, CoreError::UnsupportedSchemaVersion { version: 99 });
    }

    #[test]
    fn intermediate_versions_are_rejected() {
        for version in [1, 2] {
            let err = resolve(&record(json!({ "version": version }))).unwrap_err();
            assert_eq!(err, CoreError::UnsupportedSchemaVersion { version });
        }
    }

    #[test]
    fn non_integer_version_is_rejected() {
        let err = resolve(&record(json!({"version": "3"}))).unwrap_err();
        assert_eq!(err, CoreError::invalid_version_tag("string"));

        let err = resolve(&record(json!({"version": 3.5}))).unwrap_err();
        assert_eq!(err, CoreError::invalid_version_tag("number 3.5"));
    }

    #[test]
    fn field_names_per_version() {
        assert_eq!(VersionMapping::Pre3.config_field(), "config");
        assert_eq!(VersionMapping::V3.config_field(), "config_v_003");
        for mapping in [VersionMapping::Pre3, VersionMapping::V3] {
            assert_eq!(mapping.class_name_field(), "class");
            assert_eq!(mapping.info_logging_field(), "info_logging");
        }
        assert_eq!(VersionMapping::Pre3.version(), None);
        assert_eq!(VersionMapping::V3.version(), Some(3));
    }

    #[test]
    fn for_version_matches_version() {
        for mapping in [VersionMapping::Pre3, VersionMapping::V3] {
            assert_eq!(VersionMapping::for_version(mapping.version()).unwrap(), mapping);
        }
    }

    #[test]
    fn extracts_class_name() {
        let source = record(json!({"class": "querqy.CommonRules"}));
        assert_eq!(
            VersionMapping::V3.class_name("r1", &source).unwrap(),
            "querqy.CommonRules"
        );
    }

    #[test]
    fn class_name_must_be_a_string() {
        let err = VersionMapping::V3
            .class_name("r1", &record(json!({"class": 1})))
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { ref rewriter_id, .. } if rewriter_id == "r1"));

        let err = VersionMapping::Pre3
            .class_name("r1", &RawRecord::new())
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn extracts_info_logging() {
        let source = record(json!({"info_logging": {"sinks": ["log4j"]}}));
        let settings = VersionMapping::Pre3.info_logging("r1", &source).unwrap();
        assert_eq!(settings.and_then(|s| s.get("sinks")), Some(&json!(["log4j"])));

        assert_eq!(
            VersionMapping::V3.info_logging("r1", &RawRecord::new()).unwrap(),
            None
        );

        let err = VersionMapping::V3
            .info_logging("r1", &record(json!({"info_logging": "log4j"})))
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn decode_config_reads_chunks() {
        let source = record(json!({"version": 3, "config_v_003": ["{\"a\":1", "}"]}));
        let config = decode_config(&source, VersionMapping::V3, "r1").unwrap();
        assert_eq!(Value::Object(config), json!({"a": 1}));
    }

    #[test]
    fn has_config_ignores_absent_and_null() {
        assert!(!VersionMapping::V3.has_config(&RawRecord::new()));
        assert!(!VersionMapping::V3.has_config(&record(json!({"config_v_003": null}))));
        assert!(VersionMapping::V3.has_config(&record(json!({"config_v_003": "{}"}))));
        assert!(!VersionMapping::Pre3.has_config(&record(json!({"config_v_003": "{}"}))));
    }

    #[test]
    fn decode_config_uses_mapping_field() {
        let source = record(json!({"config": "{\"legacy\":true}", "config_v_003": "{\"v3\":true}"}));
        let legacy = VersionMapping::Pre3.config("r1", &source).unwrap();
        assert_eq!(legacy.get("legacy"), Some(&json!(true)));
        let current = VersionMapping::V3.config("r1", &source).unwrap();
        assert_eq!(current.get("v3"), Some(&json!(true)));
    }

    #[test]
    fn decode_config_absent_or_blank_is_empty() {
        assert!(decode_config(&RawRecord::new(), VersionMapping::V3, "r1")
            .unwrap()
            .is_empty());
        let blank = record(json!({"config_v_003": ["  ", " "]}));
        assert!(decode_config(&blank, VersionMapping::V3, "r1")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn decode_config_names_rewriter_on_parse_failure() {
        let source = record(json!({"config_v_003": "{not json"}));
        let err = decode_config(&source, VersionMapping::V3, "my_rules").unwrap_err();
        assert!(matches!(err, CoreError::MalformedConfig { ref rewriter_id, .. } if rewriter_id == "my_rules"));
        assert!(err.to_string().contains("my_rules"));
    }

    #[test]
    fn decode_config_rejects_unexpected_shape() {
        let source = record(json!({"config_v_003": {"a": 1}}));
        let err = decode_config(&source, VersionMapping::V3, "r1").unwrap_err();
        assert_eq!(
            err,
            CoreError::Codec(CodecError::unexpected_shape("object"))
        );
    }
}
