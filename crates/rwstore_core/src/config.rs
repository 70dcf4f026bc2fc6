//! Rewriter store configuration.

/// Default name of the index that holds rewriter records.
pub const DEFAULT_INDEX_NAME: &str = ".rewriters";

/// Configuration for a [`crate::RewriterStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Name of the index holding rewriter records.
    pub index_name: String,

    /// Whether to create the index on the first write if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to check the index mapping and upgrade it on the first write.
    pub check_mappings: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            create_if_missing: true,
            check_mappings: true,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the index name.
    #[must_use]
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    /// Sets whether to create the index if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to check and upgrade the index mapping.
    #[must_use]
    pub const fn check_mappings(mut self, value: bool) -> Self {
        self.check_mappings = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.index_name, DEFAULT_INDEX_NAME);
        assert!(config.create_if_missing);
        assert!(config.check_mappings);
    }

    #[test]
    fn builder_pattern() {
        let config = StoreConfig::new()
            .index_name("custom")
            .create_if_missing(false)
            .check_mappings(false);

        assert_eq!(config.index_name, "custom");
        assert!(!config.create_if_missing);
        assert!(!config.check_mappings);
    }
}
