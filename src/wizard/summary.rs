//! Summary page: shows the selections, commits the import and reports status

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::error::{WizardError, WizardResult};
use super::page::{Lifecycle, PageContext, WizardPage};
use crate::config::ImportConfig;
use crate::connection_string;
use crate::host::{
    ChangeColumnSettingsParams, ConnectionHost, FlatFileProvider, InsertDataParams,
    QueryProvider, SimpleExecuteResult,
};
use crate::models::{ColumnDescriptor, Connection, ImportDataModel, PageKind};
use crate::sql;

/// Outcome of one commit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ImportStatus {
    /// Insert succeeded; `rows` is `None` when the count could not be determined
    Succeeded {
        schema: String,
        table: String,
        rows: Option<u64>,
    },
    /// Insert failed; the wizard stays on the summary page for a retry
    Failed { message: String },
}

impl ImportStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportStatus::Succeeded { .. })
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportStatus::Succeeded {
                schema,
                table,
                rows: Some(rows),
            } => write!(
                f,
                "✔ Awesome! You have successfully inserted {} rows into {}.{}.",
                rows, schema, table
            ),
            ImportStatus::Succeeded {
                schema,
                table,
                rows: None,
            } => write!(
                f,
                "✔ Awesome! You have successfully inserted the data into {}.{} (row count unknown).",
                schema, table
            ),
            ImportStatus::Failed { message } => {
                write!(f, "✗ Importing data failed: {}", message)
            }
        }
    }
}

/// Read-only state a renderer shows for the summary page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryView {
    pub loading: bool,
    /// Key/value table of the accumulated selections
    pub rows: Vec<(String, String)>,
    pub status: Option<ImportStatus>,
    pub attempts: u32,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

/// Terminal page of the wizard
pub struct SummaryPage {
    connections: Arc<dyn ConnectionHost>,
    queries: Arc<dyn QueryProvider>,
    flat_file: Arc<dyn FlatFileProvider>,
    config: ImportConfig,
    lifecycle: Lifecycle,
    view: SummaryView,
}

impl SummaryPage {
    pub fn new(
        connections: Arc<dyn ConnectionHost>,
        queries: Arc<dyn QueryProvider>,
        flat_file: Arc<dyn FlatFileProvider>,
        config: ImportConfig,
    ) -> Self {
        Self {
            connections,
            queries,
            flat_file,
            config,
            lifecycle: Lifecycle::default(),
            view: SummaryView::default(),
        }
    }

    pub fn view(&self) -> &SummaryView {
        &self.view
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Commit the import described by `model`.
    ///
    /// Never fails: every error becomes `ImportStatus::Failed`, which is also
    /// stored in the view. The model is not modified, so a commit can be retried.
    pub async fn commit(&mut self, model: &ImportDataModel) -> ImportStatus {
        self.view.attempts += 1;
        self.view.last_attempt_at = Some(Utc::now());

        let span = info_span!(
            "import_commit",
            attempt = self.view.attempts,
            table = model.table().unwrap_or_default()
        );
        let status = match self.try_commit(model).instrument(span).await {
            Ok(status) => status,
            Err(e) => {
                error!(error = %e, "Import failed");
                ImportStatus::Failed {
                    message: e.to_string(),
                }
            }
        };

        self.view.status = Some(status.clone());
        status
    }

    async fn try_commit(&self, model: &ImportDataModel) -> WizardResult<ImportStatus> {
        let server = model
            .server()
            .ok_or_else(|| WizardError::MissingInput("server".to_string()))?;
        let database = model
            .database()
            .ok_or_else(|| WizardError::MissingInput("database".to_string()))?;
        let schema = model
            .schema()
            .ok_or_else(|| WizardError::MissingInput("schema".to_string()))?;
        let table = model
            .table()
            .ok_or_else(|| WizardError::MissingInput("table name".to_string()))?;

        if let Ok(snapshot) = model.to_json() {
            debug!(model = %snapshot, "Committing import");
        }
        self.update_columns(model.prose_columns()).await;

        let connection_string =
            connection_string::resolve(self.connections.as_ref(), server, database).await?;
        let params = InsertDataParams {
            connection_string,
            batch_size: self.config.batch_size,
        };
        info!(?params, "Sending insert request");

        let response = self.flat_file.send_insert_data_request(params).await?;
        if !response.result.success {
            return Err(WizardError::ImportFailed(
                response
                    .result
                    .error_message
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let rows = if self.config.fetch_row_count {
            self.fetch_row_count(server, database, schema, table).await
        } else {
            None
        };
        info!(rows = ?rows, "Import succeeded");

        Ok(ImportStatus::Succeeded {
            schema: schema.to_string(),
            table: table.to_string(),
            rows,
        })
    }

    /// Send one settings update per column and wait for all of them.
    ///
    /// The updates address distinct column indices, so they run concurrently.
    /// A failed update is logged and does not stop the import.
    async fn update_columns(&self, columns: &[ColumnDescriptor]) {
        let flat_file = self.flat_file.as_ref();
        let requests = columns.iter().enumerate().map(|(index, column)| {
            let params = ChangeColumnSettingsParams {
                index,
                new_name: column.column_name.clone(),
                new_data_type: column.data_type.clone(),
                new_nullable: column.nullable,
                new_in_primary_key: column.primary_key,
            };
            async move { (index, flat_file.send_change_column_settings_request(params).await) }
        });

        for (index, result) in join_all(requests).await {
            match result {
                Ok(response) if response.result.success => {
                    debug!(index, "Column settings updated");
                }
                Ok(response) => {
                    warn!(
                        index,
                        error = response.result.error_message.as_deref().unwrap_or_default(),
                        "Column settings update rejected"
                    );
                }
                Err(e) => {
                    warn!(index, error = %e, "Column settings update failed");
                }
            }
        }
    }

    async fn fetch_row_count(
        &self,
        server: &Connection,
        database: &str,
        schema: &str,
        table: &str,
    ) -> Option<u64> {
        let uri = match self
            .connections
            .get_uri_for_connection(&server.connection_id)
            .await
        {
            Ok(uri) => uri,
            Err(e) => {
                warn!(error = %e, "Could not resolve connection URI for row count");
                return None;
            }
        };

        let query = sql::row_count_query(database, schema, table);
        match self.queries.run_query_and_return(&uri, &query).await {
            Ok(result) => {
                let rows = parse_row_count(&result);
                if rows.is_none() {
                    warn!("Row count query returned no numeric value");
                }
                rows
            }
            Err(e) => {
                warn!(error = %e, "Row count query failed");
                None
            }
        }
    }
}

/// Read a non-negative count from the first cell; NULL or non-numeric gives `None`
pub fn parse_row_count(result: &SimpleExecuteResult) -> Option<u64> {
    result.first_cell()?.value()?.trim().parse::<u64>().ok()
}

#[async_trait]
impl WizardPage for SummaryPage {
    fn kind(&self) -> PageKind {
        PageKind::Summary
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    async fn start(&mut self) -> WizardResult<bool> {
        self.lifecycle.start(PageKind::Summary)?;
        self.view = SummaryView::default();
        Ok(true)
    }

    async fn on_page_enter(&mut self, ctx: &mut PageContext<'_>) -> WizardResult<()> {
        self.lifecycle.enter(PageKind::Summary)?;

        self.view.loading = true;
        self.view.rows = ctx.model.summary_rows();
        self.commit(ctx.model).await;
        self.view.loading = false;

        ctx.signals.import_another_file_visible = true;
        Ok(())
    }

    async fn on_page_leave(&mut self, ctx: &mut PageContext<'_>) -> WizardResult<()> {
        if self.lifecycle.leave() {
            ctx.signals.import_another_file_visible = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DbCellValue;

    #[test]
    fn test_parse_row_count() {
        let result = SimpleExecuteResult::single_column("", &["42"]);
        assert_eq!(parse_row_count(&result), Some(42));

        let result = SimpleExecuteResult::single_column("", &[" 7 "]);
        assert_eq!(parse_row_count(&result), Some(7));

        let result = SimpleExecuteResult::single_column("", &["forty-two"]);
        assert_eq!(parse_row_count(&result), None);

        let result = SimpleExecuteResult::single_column("", &["-1"]);
        assert_eq!(parse_row_count(&result), None);

        let result = SimpleExecuteResult {
            row_count: 1,
            column_info: vec![String::new()],
            rows: vec![vec![DbCellValue::null()]],
        };
        assert_eq!(parse_row_count(&result), None);

        assert_eq!(parse_row_count(&SimpleExecuteResult::default()), None);
    }

    #[test]
    fn test_status_wording() {
        let ok = ImportStatus::Succeeded {
            schema: "dbo".to_string(),
            table: "orders".to_string(),
            rows: Some(42),
        };
        assert!(ok.is_success());
        assert!(ok.to_string().contains("42"));

        let unknown = ImportStatus::Succeeded {
            schema: "dbo".to_string(),
            table: "orders".to_string(),
            rows: None,
        };
        assert!(unknown.to_string().contains("row count unknown"));

        let failed = ImportStatus::Failed {
            message: "timeout".to_string(),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.to_string(), "✗ Importing data failed: timeout");
    }
}
