//! Validation functionality
//!
//! Provides validation logic for:
//! - Target table names (non-empty, unique within the selected database)

pub mod tables;

pub use tables::{
    TableNameValidator, ValidationError, ValidationResult, table_name_from_path,
    validate_new_table_name,
};
