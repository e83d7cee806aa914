//! Target table name validation
//!
//! A new table name is accepted iff it is non-empty and not already used by a
//! table in the selected database.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur during table name validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Name collides with an existing table
    #[error("Table name '{0}' already exists in the database")]
    Duplicate(String),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Existing table names of the active database
///
/// # Example
///
/// ```rust
/// use flat_file_import::validation::TableNameValidator;
///
/// let validator = TableNameValidator::new(["orders".to_string()]);
/// assert!(validator.validate("orders").is_err());
/// assert!(validator.validate("orders2").is_ok());
/// assert!(validator.validate("").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableNameValidator {
    existing: HashSet<String>,
}

impl TableNameValidator {
    pub fn new(existing: impl IntoIterator<Item = String>) -> Self {
        Self {
            existing: existing.into_iter().collect(),
        }
    }

    /// Replace the cached names
    pub fn replace(&mut self, existing: impl IntoIterator<Item = String>) {
        self.existing = existing.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.existing.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.existing.contains(name)
    }

    pub fn len(&self) -> usize {
        self.existing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.existing.is_empty()
    }

    pub fn validate(&self, name: &str) -> ValidationResult<()> {
        validate_new_table_name(name, &self.existing)
    }
}

/// Validate a candidate name against the set of existing table names
pub fn validate_new_table_name(name: &str, existing: &HashSet<String>) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Empty("table name"));
    }

    if existing.contains(name) {
        return Err(ValidationError::Duplicate(name.to_string()));
    }

    Ok(())
}

/// Default table name for a source file: its file name without extension
pub fn table_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
}
