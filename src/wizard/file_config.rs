//! Configuration page: connection, database, schema, source file and table name

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::error::{WizardError, WizardResult};
use super::page::{Lifecycle, PageContext, WizardPage};
use crate::host::{ConnectionHost, QueryProvider};
use crate::models::{Connection, ImportDataModel, PageKind};
use crate::sql;
use crate::validation::{TableNameValidator, table_name_from_path};

/// Dropdown population steps, in dependency order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationStep {
    Servers,
    Databases,
    Schemas,
}

impl PopulationStep {
    pub fn name(&self) -> &'static str {
        match self {
            PopulationStep::Servers => "servers",
            PopulationStep::Databases => "databases",
            PopulationStep::Schemas => "schemas",
        }
    }

    /// Step that depends on this one
    pub fn next(&self) -> Option<PopulationStep> {
        match self {
            PopulationStep::Servers => Some(PopulationStep::Databases),
            PopulationStep::Databases => Some(PopulationStep::Schemas),
            PopulationStep::Schemas => None,
        }
    }
}

/// An entry of the server dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownItem {
    pub value: String,
    pub display_name: String,
}

/// Read-only state a renderer shows for the configuration page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfigView {
    pub servers: Vec<DropdownItem>,
    pub databases: Vec<String>,
    pub schemas: Vec<String>,
    pub file_path: String,
    pub table_name: String,
    /// Message for the last rejected table name
    pub table_name_error: Option<String>,
}

/// Collects connection, database, schema, file and table selections
pub struct FileConfigPage {
    connections: Arc<dyn ConnectionHost>,
    queries: Arc<dyn QueryProvider>,
    lifecycle: Lifecycle,
    view: FileConfigView,
    active_connections: Vec<Connection>,
    existing_tables: TableNameValidator,
}

impl FileConfigPage {
    pub fn new(connections: Arc<dyn ConnectionHost>, queries: Arc<dyn QueryProvider>) -> Self {
        Self {
            connections,
            queries,
            lifecycle: Lifecycle::default(),
            view: FileConfigView::default(),
            active_connections: Vec::new(),
            existing_tables: TableNameValidator::default(),
        }
    }

    pub fn view(&self) -> &FileConfigView {
        &self.view
    }

    /// Table names of the selected database, used only for uniqueness checks
    pub fn existing_tables(&self) -> &TableNameValidator {
        &self.existing_tables
    }

    /// The user picked another connection
    pub async fn select_server(
        &mut self,
        model: &mut ImportDataModel,
        connection_id: &str,
    ) -> WizardResult<bool> {
        if !self.accepts_input("select_server") {
            return Ok(false);
        }
        let connection = self
            .active_connections
            .iter()
            .find(|c| c.connection_id == connection_id)
            .cloned()
            .ok_or_else(|| {
                WizardError::InvalidSelection(format!("unknown connection '{}'", connection_id))
            })?;

        model.set_server(connection);
        self.populate_from(PopulationStep::Databases, model).await?;
        Ok(true)
    }

    /// The user picked another database
    pub async fn select_database(
        &mut self,
        model: &mut ImportDataModel,
        database: &str,
    ) -> WizardResult<bool> {
        if !self.accepts_input("select_database") {
            return Ok(false);
        }
        if !self.view.databases.iter().any(|d| d == database) {
            return Err(WizardError::InvalidSelection(format!(
                "unknown database '{}'",
                database
            )));
        }

        model.set_database(database);
        self.populate_from(PopulationStep::Schemas, model).await?;
        Ok(true)
    }

    /// The user picked another schema
    pub fn select_schema(&mut self, model: &mut ImportDataModel, schema: &str) -> WizardResult<bool> {
        if !self.accepts_input("select_schema") {
            return Ok(false);
        }
        if !self.view.schemas.iter().any(|s| s == schema) {
            return Err(WizardError::InvalidSelection(format!(
                "unknown schema '{}'",
                schema
            )));
        }
        model.set_schema(schema)?;
        Ok(true)
    }

    /// A source file was chosen; its stem becomes the proposed table name
    pub fn set_file_path(
        &mut self,
        model: &mut ImportDataModel,
        path: impl Into<PathBuf>,
    ) -> WizardResult<bool> {
        if !self.accepts_input("set_file_path") {
            return Ok(false);
        }
        let path = path.into();
        self.view.file_path = path.display().to_string();
        let proposed = table_name_from_path(&path);
        model.set_file_path(path);

        if let Some(table) = proposed {
            self.apply_table_name(model, table)?;
        }
        Ok(true)
    }

    /// The table name text changed. Returns `Ok(false)` when the name was rejected
    /// or the page is inactive; the rejection message is kept in the view.
    pub fn set_table_name(
        &mut self,
        model: &mut ImportDataModel,
        name: impl Into<String>,
    ) -> WizardResult<bool> {
        if !self.accepts_input("set_table_name") {
            return Ok(false);
        }
        self.apply_table_name(model, name.into())
    }

    fn apply_table_name(&mut self, model: &mut ImportDataModel, name: String) -> WizardResult<bool> {
        self.view.table_name = name;
        self.revalidate_table_name(model)
    }

    /// Check the current table name against the cached table set and sync the model
    fn revalidate_table_name(&mut self, model: &mut ImportDataModel) -> WizardResult<bool> {
        match self.existing_tables.validate(&self.view.table_name) {
            Ok(()) => {
                self.view.table_name_error = None;
                if model.database().is_some()
                    && model.table() != Some(self.view.table_name.as_str())
                {
                    model.set_table(self.view.table_name.clone())?;
                }
                Ok(true)
            }
            Err(e) => {
                debug!(table = %self.view.table_name, error = %e, "Table name rejected");
                self.view.table_name_error = Some(e.to_string());
                model.clear_table();
                Ok(false)
            }
        }
    }

    fn accepts_input(&self, action: &str) -> bool {
        if self.lifecycle.is_active() {
            true
        } else {
            debug!(action, "Ignoring input for inactive configuration page");
            false
        }
    }

    /// Run the population steps from `step` onwards, stopping at the first empty list
    async fn populate_from(
        &mut self,
        step: PopulationStep,
        model: &mut ImportDataModel,
    ) -> WizardResult<()> {
        let mut current = Some(step);
        while let Some(step) = current {
            let populated = match step {
                PopulationStep::Servers => self.populate_servers(model).await?,
                PopulationStep::Databases => self.populate_databases(model).await?,
                PopulationStep::Schemas => self.populate_schemas(model).await?,
            };
            if !populated {
                debug!(step = step.name(), "Nothing to select, stopping population");
                break;
            }
            current = step.next();
        }
        Ok(())
    }

    async fn populate_servers(&mut self, model: &mut ImportDataModel) -> WizardResult<bool> {
        self.view.servers.clear();
        self.active_connections = self.connections.get_active_connections().await?;
        if self.active_connections.is_empty() {
            info!("No active connections");
            self.view.databases.clear();
            self.view.schemas.clear();
            self.existing_tables.clear();
            model.clear_server();
            return Ok(false);
        }

        self.view.servers = self
            .active_connections
            .iter()
            .map(|c| DropdownItem {
                value: c.connection_id.clone(),
                display_name: c.display_name(),
            })
            .collect();

        let kept = model.server().is_some_and(|server| {
            self.active_connections
                .iter()
                .any(|c| c.connection_id == server.connection_id)
        });
        if !kept {
            let first = self.active_connections[0].clone();
            debug!(connection_id = %first.connection_id, "Defaulting to first connection");
            model.set_server(first);
        }
        Ok(true)
    }

    async fn populate_databases(&mut self, model: &mut ImportDataModel) -> WizardResult<bool> {
        self.view.databases.clear();
        self.view.schemas.clear();
        self.existing_tables.clear();

        let connection_id = match model.server() {
            Some(server) => server.connection_id.clone(),
            None => return Ok(false),
        };
        self.view.databases = self.connections.list_databases(&connection_id).await?;

        match select_default(&self.view.databases, model.database()) {
            Some(database) => {
                if model.database() != Some(database.as_str()) {
                    model.set_database(database);
                }
                Ok(true)
            }
            None => {
                info!(connection_id = %connection_id, "Connection has no databases");
                Ok(false)
            }
        }
    }

    async fn populate_schemas(&mut self, model: &mut ImportDataModel) -> WizardResult<bool> {
        self.view.schemas.clear();
        self.existing_tables.clear();

        let (connection_id, database) = match (model.server(), model.database()) {
            (Some(server), Some(database)) => {
                (server.connection_id.clone(), database.to_string())
            }
            _ => return Ok(false),
        };

        let uri = match self.connections.get_uri_for_connection(&connection_id).await {
            Ok(uri) => Some(uri),
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "Could not resolve connection URI");
                None
            }
        };

        if let Some(uri) = uri {
            self.view.schemas = self
                .query_names(&uri, &sql::schemas_query(&database))
                .await;
            let tables = self
                .query_names(&uri, &sql::table_names_query(&database))
                .await;
            self.existing_tables.replace(tables);
        }

        debug!(
            database = %database,
            schemas = self.view.schemas.len(),
            tables = self.existing_tables.len(),
            "Populated schemas and table names"
        );

        if !self.view.table_name.is_empty() {
            self.revalidate_table_name(model)?;
        }

        match select_default(&self.view.schemas, model.schema()) {
            Some(schema) => {
                if model.schema() != Some(schema.as_str()) {
                    model.set_schema(schema)?;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// First-column values of a metadata query; failures count as an empty result
    async fn query_names(&self, uri: &str, query: &str) -> Vec<String> {
        match self.queries.run_query_and_return(uri, query).await {
            Ok(result) => result.first_column(),
            Err(e) => {
                warn!(query, error = %e, "Metadata query failed");
                Vec::new()
            }
        }
    }
}

/// Keep the current selection while it is still listed, otherwise take the first item
fn select_default(items: &[String], current: Option<&str>) -> Option<String> {
    match current {
        Some(current) if items.iter().any(|i| i == current) => Some(current.to_string()),
        _ => items.first().cloned(),
    }
}

#[async_trait]
impl WizardPage for FileConfigPage {
    fn kind(&self) -> PageKind {
        PageKind::FileConfig
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    async fn start(&mut self) -> WizardResult<bool> {
        self.lifecycle.start(PageKind::FileConfig)?;
        self.view = FileConfigView::default();
        Ok(true)
    }

    async fn on_page_enter(&mut self, ctx: &mut PageContext<'_>) -> WizardResult<()> {
        self.lifecycle.enter(PageKind::FileConfig)?;
        if let Err(e) = self.populate_from(PopulationStep::Servers, ctx.model).await {
            self.lifecycle.leave();
            return Err(e);
        }
        Ok(())
    }

    async fn on_page_leave(&mut self, _ctx: &mut PageContext<'_>) -> WizardResult<()> {
        if !self.lifecycle.leave() {
            debug!("Configuration page left before it was entered");
        }
        Ok(())
    }

    fn can_leave(&self, model: &ImportDataModel) -> WizardResult<()> {
        if model.server().is_none() {
            return Err(WizardError::MissingInput("server".to_string()));
        }
        if model.database().is_none() {
            return Err(WizardError::MissingInput("database".to_string()));
        }
        if model.schema().is_none() {
            return Err(WizardError::MissingInput("schema".to_string()));
        }
        if model.file_path().is_none() {
            return Err(WizardError::MissingInput("file path".to_string()));
        }
        self.existing_tables.validate(&self.view.table_name)?;
        if model.table().is_none() {
            return Err(WizardError::MissingInput("table name".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_order() {
        let mut steps = vec![PopulationStep::Servers];
        while let Some(next) = steps.last().and_then(|s| s.next()) {
            steps.push(next);
        }
        assert_eq!(
            steps,
            vec![
                PopulationStep::Servers,
                PopulationStep::Databases,
                PopulationStep::Schemas
            ]
        );
    }

    #[test]
    fn test_select_default() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(select_default(&items, None), Some("a".to_string()));
        assert_eq!(select_default(&items, Some("b")), Some("b".to_string()));
        assert_eq!(select_default(&items, Some("gone")), Some("a".to_string()));
        assert_eq!(select_default(&[], Some("a")), None);
    }
}
