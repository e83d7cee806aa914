//! Flat File Import - wizard core for importing flat files into SQL Server
//!
//! Provides:
//! - The import data model shared across wizard pages
//! - Capability traits for the host's connection, query and import services
//! - The configuration and summary pages and the controller that navigates them
//! - Connection string synthesis and metadata query text

pub mod config;
pub mod connection_string;
pub mod host;
pub mod models;
pub mod sql;
pub mod validation;
pub mod wizard;

// Re-export commonly used types
pub use config::{ConfigError, ImportConfig};
pub use host::{
    ConnectionHost, FlatFileProvider, HostCall, HostError, HostResult, InMemoryHost,
    QueryProvider,
};
pub use models::{
    AuthenticationType, ColumnDescriptor, Connection, ConnectionOptions, Credentials,
    ImportDataModel, ModelError, PageKind,
};
pub use validation::{TableNameValidator, ValidationError};
pub use wizard::{
    FileConfigPage, ImportStatus, ImportWizard, SummaryPage, WizardError, WizardPage,
    WizardResult, WizardSignals,
};
