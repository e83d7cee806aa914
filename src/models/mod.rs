//! Models module
//!
//! Defines the data structures shared between the wizard pages and the host
//! collaborators.

pub mod column;
pub mod connection;
pub mod import_model;
pub mod page;

pub use column::ColumnDescriptor;
pub use connection::{AuthenticationType, Connection, ConnectionOptions, Credentials};
pub use import_model::{ImportDataModel, ModelError};
pub use page::PageKind;
