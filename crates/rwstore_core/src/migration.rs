//! Index mapping upgrades.
//!
//! The rewriter index mapping has gone through three eras:
//!
//! 1. No `info_logging` and no `config_v_003` property
//! 2. `info_logging` added
//! 3. `config_v_003` added, an unindexed keyword field holding the
//!    chunked config
//!
//! Before the first write, the store inspects the mapping and applies at
//! most one [`MappingUpgrade`] that brings it to the current era. Upgrades
//! only add properties, so applying one twice is harmless.
//!
//! ## Design Philosophy
//!
//! - **Detect, don't record**: the mapping itself tells which era it is in
//! - **Forward-only**: properties are never removed
//! - **Once per store**: a [`MappingCheck`] remembers that the mapping has
//!   been checked, so later writes skip the inspection

use crate::error::{CoreError, CoreResult};
use crate::version::{VersionMapping, PROP_TYPE, PROP_VERSION};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};

/// Version number of an index mapping era.
pub type MappingVersion = u64;

/// The mapping era new indices are created in.
pub const CURRENT_INDEX_MAPPING_VERSION: MappingVersion = 3;

/// Returns the full mapping for a freshly created rewriter index.
pub fn index_mapping() -> Value {
    let current = VersionMapping::CURRENT;
    let legacy = VersionMapping::Pre3;
    let mut properties = serde_json::Map::new();
    properties.insert(PROP_TYPE.to_string(), json!({"type": "keyword"}));
    properties.insert(PROP_VERSION.to_string(), json!({"type": "integer"}));
    properties.insert(
        current.class_name_field().to_string(),
        json!({"type": "keyword"}),
    );
    properties.insert(legacy.config_field().to_string(), config_field_mapping());
    properties.insert(current.config_field().to_string(), config_field_mapping());
    properties.insert(
        current.info_logging_field().to_string(),
        info_logging_mapping(),
    );
    json!({ "properties": properties })
}

fn config_field_mapping() -> Value {
    json!({"type": "keyword", "doc_values": false, "index": false})
}

fn info_logging_mapping() -> Value {
    json!({"properties": {"sinks": {"type": "keyword"}}})
}

/// An upgrade of an existing index mapping to the current era.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingUpgrade {
    /// Adds `info_logging` and `config_v_003`.
    V1ToV3,
    /// Adds `config_v_003`.
    V2ToV3,
}

impl MappingUpgrade {
    /// Works out which upgrade, if any, `mapping` needs.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the mapping has no `properties` object.
    pub fn detect(mapping: &Value) -> CoreResult<Option<Self>> {
        let properties = mapping
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                rwstore_storage::StorageError::InvalidMapping(
                    "rewriter index mapping has no properties".to_string(),
                )
            })?;

        let current = VersionMapping::CURRENT;
        if !properties.contains_key(current.info_logging_field()) {
            Ok(Some(MappingUpgrade::V1ToV3))
        } else if !properties.contains_key(current.config_field()) {
            Ok(Some(MappingUpgrade::V2ToV3))
        } else {
            Ok(None)
        }
    }

    /// The era this upgrade starts from.
    pub const fn from_version(self) -> MappingVersion {
        match self {
            MappingUpgrade::V1ToV3 => 1,
            MappingUpgrade::V2ToV3 => 2,
        }
    }

    /// The era this upgrade ends in.
    pub const fn to_version(self) -> MappingVersion {
        CURRENT_INDEX_MAPPING_VERSION
    }

    /// Short name used in logs and errors.
    pub const fn name(self) -> &'static str {
        match self {
            MappingUpgrade::V1ToV3 => "update_1_to_3",
            MappingUpgrade::V2ToV3 => "update_2_to_3",
        }
    }

    /// Human-readable description of the change.
    pub const fn description(self) -> &'static str {
        match self {
            MappingUpgrade::V1ToV3 => "add info_logging and config_v_003 properties",
            MappingUpgrade::V2ToV3 => "add config_v_003 property",
        }
    }

    /// The mapping patch to send to the index.
    pub fn patch(self) -> Value {
        let current = VersionMapping::CURRENT;
        let mut properties = serde_json::Map::new();
        if self == MappingUpgrade::V1ToV3 {
            properties.insert(
                current.info_logging_field().to_string(),
                info_logging_mapping(),
            );
        }
        properties.insert(current.config_field().to_string(), config_field_mapping());
        json!({ "properties": properties })
    }

    /// Turns an unacknowledged patch into an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MappingNotAcknowledged`] if `acknowledged` is
    /// false.
    pub fn require_acknowledged(self, acknowledged: bool) -> CoreResult<()> {
        if acknowledged {
            Ok(())
        } else {
            Err(CoreError::MappingNotAcknowledged {
                upgrade: self.name().to_string(),
            })
        }
    }
}

/// Remembers whether a store has already checked its index mapping.
///
/// Owned by one store; not global. Two writers racing on the first write
/// may both run the check, which is fine because upgrades are idempotent.
#[derive(Debug, Default)]
pub struct MappingCheck {
    checked: AtomicBool,
}

impl MappingCheck {
    /// Creates an unchecked state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the mapping has been checked.
    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::Acquire)
    }

    /// Records that the mapping is known to be current.
    pub fn mark_checked(&self) {
        self.checked.store(true, Ordering::Release);
    }

    /// Forgets the check, e.g. after the index was dropped.
    pub fn reset(&self) {
        self.checked.store(false, Ordering::Release);
    }
}
