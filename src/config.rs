//! Import configuration
//!
//! Settings the summary page uses when committing an import. Missing keys fall
//! back to their defaults, so an empty TOML document is a valid configuration.
//!
//! ```toml
//! batch_size = 1000
//! fetch_row_count = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of rows sent per insert batch
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for the import commit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImportConfig {
    /// Batch size sent with the insert request
    pub batch_size: usize,
    /// Query the row count of the new table after a successful insert
    pub fetch_row_count: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            fetch_row_count: true,
        }
    }
}

impl ImportConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the insert batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enable or disable the post-import row count
    pub fn with_fetch_row_count(mut self, fetch: bool) -> Self {
        self.fetch_row_count = fetch;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.batch_size, 500);
        assert!(config.fetch_row_count);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ImportConfig::from_toml_str("batch_size = 250").unwrap();
        assert_eq!(config.batch_size, 250);
        assert!(config.fetch_row_count);

        let config = ImportConfig::from_toml_str("").unwrap();
        assert_eq!(config, ImportConfig::default());
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        let result = ImportConfig::from_toml_str("batch_size = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = ImportConfig::from_toml_str("batch_size = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_builder() {
        let config = ImportConfig::new()
            .with_batch_size(42)
            .with_fetch_row_count(false);
        assert_eq!(config.batch_size, 42);
        assert!(!config.fetch_row_count);
    }
}
