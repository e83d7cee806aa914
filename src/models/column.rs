//! Column descriptors produced by file sniffing

use serde::{Deserialize, Serialize};

/// Column descriptor inferred from the source file
///
/// Descriptors are produced by the external sniffing service before the wizard
/// reaches the summary page. The summary page pushes each descriptor back to the
/// import service as the column's final settings.
///
/// # Example
///
/// ```rust
/// use flat_file_import::models::ColumnDescriptor;
///
/// let column = ColumnDescriptor::new("order_id", "int").with_primary_key(true);
/// assert!(column.primary_key);
/// assert!(column.nullable);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Column name as it will appear in the target table
    pub column_name: String,
    /// SQL data type (e.g., "int", "nvarchar(50)")
    pub data_type: String,
    /// Whether the column allows NULL values (default: true)
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Whether this column is part of the primary key (default: false)
    #[serde(default)]
    pub primary_key: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnDescriptor {
    /// Create a nullable, non-key column with the given name and data type.
    ///
    /// The data type is kept verbatim; the import service owns type parsing.
    pub fn new(column_name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            data_type: data_type.into(),
            nullable: true,
            primary_key: false,
        }
    }

    /// Set nullability
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set primary key membership
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_defaults() {
        let column = ColumnDescriptor::new("a", "int");
        assert_eq!(column.column_name, "a");
        assert_eq!(column.data_type, "int");
        assert!(column.nullable);
        assert!(!column.primary_key);
    }

    #[test]
    fn test_column_deserialize_defaults() {
        let column: ColumnDescriptor =
            serde_json::from_str(r#"{"columnName":"id","dataType":"bigint"}"#).unwrap();
        assert!(column.nullable);
        assert!(!column.primary_key);
    }
}
