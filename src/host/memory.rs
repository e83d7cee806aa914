//! Scripted in-memory host
//!
//! Answers every host capability from data supplied up front and records each
//! call in order, so a wizard can run without a live extension host.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::types::{
    ChangeColumnSettingsParams, ChangeColumnSettingsResponse, InsertDataParams,
    InsertDataResponse, RequestResult, SimpleExecuteResult,
};
use super::{ConnectionHost, FlatFileProvider, HostError, HostResult, QueryProvider};
use crate::models::{Connection, Credentials};

/// A recorded host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    GetActiveConnections,
    ListDatabases { connection_id: String },
    GetCredentials { connection_id: String },
    GetUri { connection_id: String },
    RunQuery { owner_uri: String, query: String },
    ChangeColumnSettings(ChangeColumnSettingsParams),
    InsertData(InsertDataParams),
}

#[derive(Debug, Default)]
struct Script {
    connections: Vec<Connection>,
    databases: HashMap<String, Vec<String>>,
    credentials: HashMap<String, Credentials>,
    queries: HashMap<String, HostResult<SimpleExecuteResult>>,
    column_failures: HashMap<usize, String>,
    insert_outcome: Option<HostResult<InsertDataResponse>>,
}

/// In-memory implementation of every host capability
///
/// # Example
///
/// ```rust
/// use flat_file_import::host::InMemoryHost;
/// use flat_file_import::models::{Connection, ConnectionOptions};
///
/// let host = InMemoryHost::new().with_connection(
///     Connection::new("c1", ConnectionOptions::integrated("localhost")),
///     &["db1"],
/// );
/// assert!(host.calls().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryHost {
    script: Mutex<Script>,
    calls: Mutex<Vec<HostCall>>,
}

impl InMemoryHost {
    /// Create an empty host with no connections
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active connection and the databases reachable through it
    pub fn with_connection(self, connection: Connection, databases: &[&str]) -> Self {
        self.add_connection(connection, databases);
        self
    }

    /// Register stored credentials for a connection
    pub fn with_credentials(self, connection_id: &str, credentials: Credentials) -> Self {
        self.script()
            .credentials
            .insert(connection_id.to_string(), credentials);
        self
    }

    /// Script the result returned for an exact query text
    pub fn with_query(self, query: impl Into<String>, result: SimpleExecuteResult) -> Self {
        self.set_query(query, Ok(result));
        self
    }

    /// Script a failure for an exact query text
    pub fn with_query_error(self, query: impl Into<String>, error: HostError) -> Self {
        self.set_query(query, Err(error));
        self
    }

    /// Make the column update at `index` fail
    pub fn with_column_failure(self, index: usize, message: impl Into<String>) -> Self {
        self.script().column_failures.insert(index, message.into());
        self
    }

    /// Script the insert outcome (defaults to success)
    pub fn with_insert_outcome(self, outcome: HostResult<InsertDataResponse>) -> Self {
        self.set_insert_outcome(outcome);
        self
    }

    pub fn add_connection(&self, connection: Connection, databases: &[&str]) {
        let mut script = self.script();
        script.databases.insert(
            connection.connection_id.clone(),
            databases.iter().map(|d| d.to_string()).collect(),
        );
        script.connections.push(connection);
    }

    /// Drop a connection, as when the user disconnects it in the host
    pub fn remove_connection(&self, connection_id: &str) {
        let mut script = self.script();
        script.connections.retain(|c| c.connection_id != connection_id);
        script.databases.remove(connection_id);
    }

    pub fn set_query(&self, query: impl Into<String>, result: HostResult<SimpleExecuteResult>) {
        self.script().queries.insert(query.into(), result);
    }

    pub fn set_insert_outcome(&self, outcome: HostResult<InsertDataResponse>) {
        self.script().insert_outcome = Some(outcome);
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls_guard().clone()
    }

    pub fn clear_calls(&self) {
        self.calls_guard().clear();
    }

    /// Owner URI handed out for a connection id
    pub fn uri_for(connection_id: &str) -> String {
        format!("connection://{}", connection_id)
    }

    fn record(&self, call: HostCall) {
        self.calls_guard().push(call);
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn calls_guard(&self) -> MutexGuard<'_, Vec<HostCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn known_connection(&self, connection_id: &str) -> HostResult<()> {
        if self
            .script()
            .connections
            .iter()
            .any(|c| c.connection_id == connection_id)
        {
            Ok(())
        } else {
            Err(HostError::Connection(format!(
                "Unknown connection: {}",
                connection_id
            )))
        }
    }
}

#[async_trait]
impl ConnectionHost for InMemoryHost {
    async fn get_active_connections(&self) -> HostResult<Vec<Connection>> {
        self.record(HostCall::GetActiveConnections);
        Ok(self.script().connections.clone())
    }

    async fn list_databases(&self, connection_id: &str) -> HostResult<Vec<String>> {
        self.record(HostCall::ListDatabases {
            connection_id: connection_id.to_string(),
        });
        self.known_connection(connection_id)?;
        Ok(self
            .script()
            .databases
            .get(connection_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_credentials(&self, connection_id: &str) -> HostResult<Credentials> {
        self.record(HostCall::GetCredentials {
            connection_id: connection_id.to_string(),
        });
        self.script()
            .credentials
            .get(connection_id)
            .cloned()
            .ok_or_else(|| {
                HostError::Credentials(format!("No stored credentials for {}", connection_id))
            })
    }

    async fn get_uri_for_connection(&self, connection_id: &str) -> HostResult<String> {
        self.record(HostCall::GetUri {
            connection_id: connection_id.to_string(),
        });
        self.known_connection(connection_id)?;
        Ok(Self::uri_for(connection_id))
    }
}

#[async_trait]
impl QueryProvider for InMemoryHost {
    async fn run_query_and_return(
        &self,
        owner_uri: &str,
        query: &str,
    ) -> HostResult<SimpleExecuteResult> {
        self.record(HostCall::RunQuery {
            owner_uri: owner_uri.to_string(),
            query: query.to_string(),
        });
        match self.script().queries.get(query) {
            Some(result) => result.clone(),
            None => Err(HostError::Query(format!(
                "No result scripted for query: {}",
                query
            ))),
        }
    }
}

#[async_trait]
impl FlatFileProvider for InMemoryHost {
    async fn send_change_column_settings_request(
        &self,
        params: ChangeColumnSettingsParams,
    ) -> HostResult<ChangeColumnSettingsResponse> {
        let index = params.index;
        self.record(HostCall::ChangeColumnSettings(params));
        match self.script().column_failures.get(&index) {
            Some(message) => Err(HostError::Service(message.clone())),
            None => Ok(ChangeColumnSettingsResponse {
                result: RequestResult::ok(),
            }),
        }
    }

    async fn send_insert_data_request(
        &self,
        params: InsertDataParams,
    ) -> HostResult<InsertDataResponse> {
        self.record(HostCall::InsertData(params));
        match &self.script().insert_outcome {
            Some(outcome) => outcome.clone(),
            None => Ok(InsertDataResponse {
                result: RequestResult::ok(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionOptions;
    use tokio::runtime::Runtime;

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_records_calls_in_order() {
        let rt = runtime();
        rt.block_on(async {
            let host = InMemoryHost::new().with_connection(
                Connection::new("c1", ConnectionOptions::integrated("localhost")),
                &["db1", "db2"],
            );

            let connections = host.get_active_connections().await.unwrap();
            assert_eq!(connections.len(), 1);
            let dbs = host.list_databases("c1").await.unwrap();
            assert_eq!(dbs, vec!["db1", "db2"]);

            assert_eq!(
                host.calls(),
                vec![
                    HostCall::GetActiveConnections,
                    HostCall::ListDatabases {
                        connection_id: "c1".to_string()
                    },
                ]
            );
        });
    }

    #[test]
    fn test_removed_connection_is_unknown() {
        let rt = runtime();
        rt.block_on(async {
            let host = InMemoryHost::new().with_connection(
                Connection::new("c1", ConnectionOptions::integrated("localhost")),
                &["db1"],
            );
            host.remove_connection("c1");

            assert!(host.get_active_connections().await.unwrap().is_empty());
            assert!(matches!(
                host.list_databases("c1").await,
                Err(HostError::Connection(_))
            ));
        });
    }

    #[test]
    fn test_unknown_connection_and_query() {
        let rt = runtime();
        rt.block_on(async {
            let host = InMemoryHost::new();
            assert!(matches!(
                host.get_uri_for_connection("missing").await,
                Err(HostError::Connection(_))
            ));
            assert!(matches!(
                host.run_query_and_return("connection://x", "SELECT 1").await,
                Err(HostError::Query(_))
            ));
            assert!(matches!(
                host.get_credentials("missing").await,
                Err(HostError::Credentials(_))
            ));
        });
    }

    #[test]
    fn test_insert_outcome_defaults_to_success() {
        let rt = runtime();
        rt.block_on(async {
            let host = InMemoryHost::new();
            let response = host
                .send_insert_data_request(InsertDataParams {
                    connection_string: "Data Source=h".to_string(),
                    batch_size: 10,
                })
                .await
                .unwrap();
            assert!(response.result.success);

            host.set_insert_outcome(Err(HostError::Timeout("timeout".to_string())));
            let result = host
                .send_insert_data_request(InsertDataParams {
                    connection_string: "Data Source=h".to_string(),
                    batch_size: 10,
                })
                .await;
            assert!(result.is_err());
        });
    }
}
