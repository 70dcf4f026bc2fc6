//! Saving and loading rewriters through an index backend.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::migration::{index_mapping, MappingCheck, MappingUpgrade};
use crate::record::{load_definition, PutRewriterRequest, RewriterDefinition};
use crate::version::VersionMapping;
use rwstore_storage::{IndexBackend, StorageError};
use serde_json::Value;
use tracing::{debug, error, info};

/// What happened while saving a rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PutOutcome {
    /// The rewriter index did not exist and was created.
    pub created_index: bool,
    /// The index mapping was upgraded before the write.
    pub applied_upgrade: Option<MappingUpgrade>,
    /// Number of elements the config was stored as (0 without config).
    pub config_chunks: usize,
}

/// Stores rewriter records in one index of an [`IndexBackend`].
///
/// The store prepares the index before the first write: it creates the
/// index if it is missing, or upgrades an old mapping to the current one.
/// That check runs once per store instance.
///
/// # Thread Safety
///
/// The store is `Sync` when the backend is; share it behind an `Arc`.
pub struct RewriterStore<B> {
    backend: B,
    config: StoreConfig,
    mapping_check: MappingCheck,
}

impl<B: IndexBackend> RewriterStore<B> {
    /// Creates a store with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    /// Creates a store with the given configuration.
    pub fn with_config(backend: B, config: StoreConfig) -> Self {
        Self {
            backend,
            config,
            mapping_check: MappingCheck::new(),
        }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns true once the index mapping has been checked.
    pub fn mapping_checked(&self) -> bool {
        self.mapping_check.is_checked()
    }

    /// Saves a rewriter from a loosely typed put payload.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRequest`] before touching the backend if
    /// the payload is invalid, otherwise see [`Self::put_request`].
    pub fn put_rewriter(&self, rewriter_id: &str, payload: &Value) -> CoreResult<PutOutcome> {
        let request = PutRewriterRequest::from_json(payload)?;
        self.put_request(rewriter_id, &request)
    }

    /// Saves a rewriter in the current schema, replacing any previous
    /// version of it.
    ///
    /// # Errors
    ///
    /// Returns codec errors from encoding the config, storage errors from
    /// the backend, and [`CoreError::MappingNotAcknowledged`] if a mapping
    /// upgrade was not confirmed.
    pub fn put_request(
        &self,
        rewriter_id: &str,
        request: &PutRewriterRequest,
    ) -> CoreResult<PutOutcome> {
        let source = request.to_stored_form()?;
        let config_chunks = match source.get(VersionMapping::CURRENT.config_field()) {
            Some(Value::Array(chunks)) => chunks.len(),
            Some(_) => 1,
            None => 0,
        };

        let mut outcome = self.prepare_index()?;
        outcome.config_chunks = config_chunks;

        if let Err(e) = self
            .backend
            .index_document(&self.config.index_name, rewriter_id, source)
        {
            error!("Could not save rewriter {}: {}", rewriter_id, e);
            return Err(e.into());
        }

        info!("Saved rewriter {}", rewriter_id);
        Ok(outcome)
    }

    /// Loads a rewriter, whatever schema version it was stored with.
    ///
    /// Returns `None` if the rewriter or the whole index does not exist.
    ///
    /// # Errors
    ///
    /// Returns version resolution and decoding errors for a stored record
    /// that cannot be read, and storage errors from the backend.
    pub fn get_rewriter(&self, rewriter_id: &str) -> CoreResult<Option<RewriterDefinition>> {
        let source = match self
            .backend
            .get_document(&self.config.index_name, rewriter_id)
        {
            Ok(Some(source)) => source,
            Ok(None) => return Ok(None),
            Err(StorageError::IndexNotFound { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        load_definition(rewriter_id, &source).map(Some).map_err(|e| {
            error!("Could not load rewriter {}: {}", rewriter_id, e);
            e
        })
    }

    /// Deletes a rewriter. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the backend.
    pub fn delete_rewriter(&self, rewriter_id: &str) -> CoreResult<bool> {
        match self
            .backend
            .delete_document(&self.config.index_name, rewriter_id)
        {
            Ok(deleted) => {
                if deleted {
                    info!("Deleted rewriter {}", rewriter_id);
                }
                Ok(deleted)
            }
            Err(StorageError::IndexNotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn prepare_index(&self) -> CoreResult<PutOutcome> {
        let index = &self.config.index_name;
        let mut outcome = PutOutcome::default();

        let mapping = match self.backend.get_mapping(index) {
            Ok(mapping) => mapping,
            Err(StorageError::IndexNotFound { .. }) if self.config.create_if_missing => {
                match self.backend.create_index(index, &index_mapping()) {
                    Ok(()) => info!("Created index {}", index),
                    // Another writer won the race; its mapping is current.
                    Err(StorageError::IndexAlreadyExists { .. }) => {
                        debug!("Index {} created concurrently", index);
                    }
                    Err(e) => return Err(e.into()),
                }
                self.mapping_check.mark_checked();
                outcome.created_index = true;
                return Ok(outcome);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.config.check_mappings || self.mapping_check.is_checked() {
            return Ok(outcome);
        }

        if let Some(upgrade) = MappingUpgrade::detect(&mapping)? {
            self.apply_upgrade(upgrade)?;
            outcome.applied_upgrade = Some(upgrade);
        } else {
            debug!("Mapping of index {} is current", index);
        }
        self.mapping_check.mark_checked();
        Ok(outcome)
    }

    fn apply_upgrade(&self, upgrade: MappingUpgrade) -> CoreResult<()> {
        let index = &self.config.index_name;
        let acknowledged = self.backend.put_mapping(index, &upgrade.patch())?;
        upgrade.require_acknowledged(acknowledged).map_err(|e: CoreError| {
            error!("Mapping upgrade {} of index {} failed: {}", upgrade.name(), index, e);
            e
        })?;
        info!(
            "Applied mapping upgrade {} ({}) to index {}",
            upgrade.name(),
            upgrade.description(),
            index
        );
        Ok(())
    }
}
