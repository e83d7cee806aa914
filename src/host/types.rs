//! Request and response shapes exchanged with host collaborators

use serde::{Deserialize, Serialize};

/// One cell of a query result, already converted to display text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DbCellValue {
    pub display_value: String,
    pub is_null: bool,
}

impl DbCellValue {
    pub fn new(display_value: impl Into<String>) -> Self {
        Self {
            display_value: display_value.into(),
            is_null: false,
        }
    }

    pub fn null() -> Self {
        Self {
            display_value: "NULL".to_string(),
            is_null: true,
        }
    }

    /// Cell text, or `None` for SQL NULL
    pub fn value(&self) -> Option<&str> {
        if self.is_null {
            None
        } else {
            Some(&self.display_value)
        }
    }
}

/// Result of `QueryProvider::run_query_and_return`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SimpleExecuteResult {
    pub row_count: usize,
    pub column_info: Vec<String>,
    pub rows: Vec<Vec<DbCellValue>>,
}

impl SimpleExecuteResult {
    /// Build a single-column result from plain values
    pub fn single_column(column: impl Into<String>, values: &[&str]) -> Self {
        let rows: Vec<Vec<DbCellValue>> = values
            .iter()
            .map(|v| vec![DbCellValue::new(*v)])
            .collect();
        Self {
            row_count: rows.len(),
            column_info: vec![column.into()],
            rows,
        }
    }

    /// Non-null values of the first column, in row order
    pub fn first_column(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.first())
            .filter_map(|cell| cell.value())
            .map(|v| v.to_string())
            .collect()
    }

    /// First cell of the first row
    pub fn first_cell(&self) -> Option<&DbCellValue> {
        self.rows.first().and_then(|row| row.first())
    }
}

/// Final settings for one sniffed column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeColumnSettingsParams {
    /// Position of the column in the sniffed descriptor list
    pub index: usize,
    pub new_name: String,
    pub new_data_type: String,
    pub new_nullable: bool,
    pub new_in_primary_key: bool,
}

/// Outcome reported by the import service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RequestResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeColumnSettingsResponse {
    pub result: RequestResult,
}

/// Insert request carrying the target connection and batch size
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertDataParams {
    pub connection_string: String,
    pub batch_size: usize,
}

impl std::fmt::Debug for InsertDataParams {
    // connection strings may embed a password
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsertDataParams")
            .field(
                "connection_string",
                &crate::connection_string::redact(&self.connection_string),
            )
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertDataResponse {
    pub result: RequestResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_column_skips_nulls() {
        let result = SimpleExecuteResult {
            row_count: 3,
            column_info: vec!["name".to_string()],
            rows: vec![
                vec![DbCellValue::new("dbo")],
                vec![DbCellValue::null()],
                vec![DbCellValue::new("sales")],
            ],
        };
        assert_eq!(result.first_column(), vec!["dbo", "sales"]);
    }

    #[test]
    fn test_first_cell_empty() {
        let result = SimpleExecuteResult::default();
        assert!(result.first_cell().is_none());
    }

    #[test]
    fn test_insert_params_debug_hides_password() {
        let params = InsertDataParams {
            connection_string: "Data Source=h;Initial Catalog=d;Integrated Security=False;User Id=sa;Password=secret".to_string(),
            batch_size: 500,
        };
        let debug = format!("{:?}", params);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("User Id=sa"));
    }
}
