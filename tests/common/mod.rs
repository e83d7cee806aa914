//! Shared fixtures for wizard integration tests

#![allow(dead_code)]

use std::sync::Arc;

use flat_file_import::host::{InMemoryHost, SimpleExecuteResult};
use flat_file_import::models::{Connection, ConnectionOptions};
use flat_file_import::sql;
use flat_file_import::{ImportConfig, ImportWizard};
use tokio::runtime::Runtime;

pub fn runtime() -> Runtime {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

pub fn connection(id: &str) -> Connection {
    Connection::new(id, ConnectionOptions::integrated("localhost").with_database("db1"))
}

/// Script schema and table-name query results for a database
pub fn with_catalog(
    host: InMemoryHost,
    database: &str,
    schemas: &[&str],
    tables: &[&str],
) -> InMemoryHost {
    host.with_query(
        sql::schemas_query(database),
        SimpleExecuteResult::single_column("name", schemas),
    )
    .with_query(
        sql::table_names_query(database),
        SimpleExecuteResult::single_column("name", tables),
    )
}

/// One connection `c1` with database `db1` holding table `orders` in schema `dbo`
pub fn single_db_host() -> InMemoryHost {
    let host = InMemoryHost::new().with_connection(connection("c1"), &["db1"]);
    with_catalog(host, "db1", &["dbo", "sales"], &["orders"])
}

pub fn wizard(host: &Arc<InMemoryHost>) -> ImportWizard {
    ImportWizard::from_host(host.clone(), ImportConfig::default())
}
