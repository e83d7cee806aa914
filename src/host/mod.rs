//! Host collaborator abstraction
//!
//! Defines the capability traits the wizard depends on. The embedding host
//! provides the implementations:
//! - ConnectionHost: active connections, databases, credentials, URIs
//! - QueryProvider: runs SQL and returns display-valued rows
//! - FlatFileProvider: the import service that receives column settings and the insert request
//!
//! InMemoryHost implements all three for embedding without a live host and for tests.

use async_trait::async_trait;

use crate::models::{Connection, Credentials};

pub mod memory;
pub mod types;

pub use memory::{HostCall, InMemoryHost};
pub use types::{
    ChangeColumnSettingsParams, ChangeColumnSettingsResponse, DbCellValue, InsertDataParams,
    InsertDataResponse, RequestResult, SimpleExecuteResult,
};

/// Error type for host operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Credential lookup failed: {0}")]
    Credentials(String),
    #[error("Import service error: {0}")]
    Service(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
}

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

/// Connection management surface of the host
#[async_trait]
pub trait ConnectionHost: Send + Sync {
    /// List connections currently open in the host
    async fn get_active_connections(&self) -> HostResult<Vec<Connection>>;

    /// List database names reachable through a connection
    async fn list_databases(&self, connection_id: &str) -> HostResult<Vec<String>>;

    /// Look up stored secrets for a connection
    async fn get_credentials(&self, connection_id: &str) -> HostResult<Credentials>;

    /// Resolve the owner URI used to address queries at a connection
    async fn get_uri_for_connection(&self, connection_id: &str) -> HostResult<String>;
}

/// Query execution surface of the host
#[async_trait]
pub trait QueryProvider: Send + Sync {
    /// Run a statement and return every row
    async fn run_query_and_return(
        &self,
        owner_uri: &str,
        query: &str,
    ) -> HostResult<SimpleExecuteResult>;
}

/// Flat-file import service
#[async_trait]
pub trait FlatFileProvider: Send + Sync {
    /// Update the settings of one sniffed column
    async fn send_change_column_settings_request(
        &self,
        params: ChangeColumnSettingsParams,
    ) -> HostResult<ChangeColumnSettingsResponse>;

    /// Create the target table and insert the file contents
    async fn send_insert_data_request(
        &self,
        params: InsertDataParams,
    ) -> HostResult<InsertDataResponse>;
}
