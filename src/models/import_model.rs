//! Shared state threaded through every wizard page

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::column::ColumnDescriptor;
use super::connection::Connection;

/// Errors raised when a model mutation violates an ordering invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("A database must be selected before setting the {0}")]
    DatabaseNotSelected(&'static str),
}

/// Import selections accumulated across the wizard
///
/// Constructed once per wizard, lent to the active page and reset when the wizard
/// finishes or is cancelled. Every mutation bumps `version`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportDataModel {
    server: Option<Connection>,
    database: Option<String>,
    schema: Option<String>,
    table: Option<String>,
    file_path: Option<PathBuf>,
    prose_columns: Vec<ColumnDescriptor>,
    version: u64,
}

impl ImportDataModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server(&self) -> Option<&Connection> {
        self.server.as_ref()
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn prose_columns(&self) -> &[ColumnDescriptor] {
        &self.prose_columns
    }

    /// Monotonic mutation counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Select a connection. Database, schema and table depend on it and are cleared.
    pub fn set_server(&mut self, server: Connection) {
        self.server = Some(server);
        self.database = None;
        self.schema = None;
        self.table = None;
        self.bump();
    }

    /// Forget the connection and everything selected under it
    pub fn clear_server(&mut self) {
        if self.server.is_none() && self.database.is_none() {
            return;
        }
        self.server = None;
        self.database = None;
        self.schema = None;
        self.table = None;
        self.bump();
    }

    /// Select a database. Schema and table depend on it and are cleared.
    pub fn set_database(&mut self, database: impl Into<String>) {
        let database = database.into();
        self.database = if database.is_empty() {
            None
        } else {
            Some(database)
        };
        self.schema = None;
        self.table = None;
        self.bump();
    }

    pub fn set_schema(&mut self, schema: impl Into<String>) -> Result<(), ModelError> {
        self.require_database("schema")?;
        self.schema = Some(schema.into());
        self.bump();
        Ok(())
    }

    /// Store an already validated table name
    pub fn set_table(&mut self, table: impl Into<String>) -> Result<(), ModelError> {
        self.require_database("table")?;
        self.table = Some(table.into());
        self.bump();
        Ok(())
    }

    pub fn clear_table(&mut self) {
        if self.table.take().is_some() {
            self.bump();
        }
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
        self.bump();
    }

    /// Replace the sniffed column descriptors
    pub fn set_prose_columns(&mut self, columns: Vec<ColumnDescriptor>) {
        self.prose_columns = columns;
        self.bump();
    }

    /// Key/value rows rendered read-only on the summary page
    pub fn summary_rows(&self) -> Vec<(String, String)> {
        let display = |v: Option<&str>| v.unwrap_or_default().to_string();
        vec![
            (
                "Server".to_string(),
                self.server
                    .as_ref()
                    .map(|s| s.options.server.clone())
                    .unwrap_or_default(),
            ),
            ("Database".to_string(), display(self.database())),
            ("Table name".to_string(), display(self.table())),
            ("Table schema".to_string(), display(self.schema())),
            (
                "File to be imported".to_string(),
                self.file_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }

    /// Return to the freshly constructed state, keeping the version moving forward
    pub fn reset(&mut self) {
        let version = self.version;
        *self = Self::default();
        self.version = version + 1;
    }

    /// Export the model to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Export the model to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn require_database(&self, field: &'static str) -> Result<(), ModelError> {
        match self.database.as_deref() {
            Some(db) if !db.is_empty() => Ok(()),
            _ => Err(ModelError::DatabaseNotSelected(field)),
        }
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionOptions;

    fn connection() -> Connection {
        Connection::new("c1", ConnectionOptions::integrated("localhost"))
    }

    #[test]
    fn test_schema_requires_database() {
        let mut model = ImportDataModel::new();
        assert_eq!(
            model.set_schema("dbo"),
            Err(ModelError::DatabaseNotSelected("schema"))
        );
        assert_eq!(
            model.set_table("orders"),
            Err(ModelError::DatabaseNotSelected("table"))
        );

        model.set_database("db1");
        model.set_schema("dbo").unwrap();
        model.set_table("orders").unwrap();
        assert_eq!(model.schema(), Some("dbo"));
        assert_eq!(model.table(), Some("orders"));
    }

    #[test]
    fn test_empty_database_counts_as_unset() {
        let mut model = ImportDataModel::new();
        model.set_database("");
        assert!(model.database().is_none());
        assert!(model.set_schema("dbo").is_err());
    }

    #[test]
    fn test_upstream_changes_clear_dependents() {
        let mut model = ImportDataModel::new();
        model.set_server(connection());
        model.set_database("db1");
        model.set_schema("dbo").unwrap();
        model.set_table("orders").unwrap();

        model.set_database("db2");
        assert!(model.schema().is_none());
        assert!(model.table().is_none());

        model.set_schema("dbo").unwrap();
        model.set_server(connection());
        assert!(model.database().is_none());
        assert!(model.schema().is_none());
    }

    #[test]
    fn test_clear_server_clears_dependents() {
        let mut model = ImportDataModel::new();
        model.clear_server();
        assert_eq!(model.version(), 0);

        model.set_server(connection());
        model.set_database("db1");
        model.set_schema("dbo").unwrap();
        model.set_table("orders").unwrap();
        model.set_file_path("/data/orders.csv");
        let version = model.version();

        model.clear_server();
        assert!(model.server().is_none());
        assert!(model.database().is_none());
        assert!(model.schema().is_none());
        assert!(model.table().is_none());
        assert!(model.file_path().is_some());
        assert_eq!(model.version(), version + 1);
    }

    #[test]
    fn test_version_increments() {
        let mut model = ImportDataModel::new();
        assert_eq!(model.version(), 0);
        model.set_file_path("/tmp/orders.csv");
        model.set_database("db1");
        assert_eq!(model.version(), 2);

        model.reset();
        assert_eq!(model.version(), 3);
        assert!(model.file_path().is_none());
        assert!(model.database().is_none());
    }

    #[test]
    fn test_json_snapshot() {
        let mut model = ImportDataModel::new();
        model.set_server(connection());
        model.set_database("db1");

        let json = model.to_json().unwrap();
        assert!(json.contains("\"database\":\"db1\""));
        assert!(json.contains("\"filePath\":null"));

        let restored: ImportDataModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn test_summary_rows() {
        let mut model = ImportDataModel::new();
        model.set_server(connection());
        model.set_database("db1");
        model.set_schema("dbo").unwrap();
        model.set_table("orders").unwrap();
        model.set_file_path("/data/orders.csv");

        let rows = model.summary_rows();
        let labels: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Server",
                "Database",
                "Table name",
                "Table schema",
                "File to be imported"
            ]
        );
        assert_eq!(rows[0].1, "localhost");
        assert_eq!(rows[2].1, "orders");
        assert_eq!(rows[4].1, "/data/orders.csv");
    }
}
